#![forbid(unsafe_code)]

//! Keyed-map store generator.
//!
//! A [`SliceStore`] owns one root atom holding a [`SliceState`] and derives
//! per-key ([`KeyAtom`]) and per-key-set ([`KeysAtom`]) views over it. Views
//! are memoized inside the store, so every caller asking for key `"a"` gets
//! the same atom identity and hooks keep one subscription across renders.
//!
//! # Invariants
//!
//! 1. The root's initial value is a deep copy of the caller's map; resets
//!    deep-copy it again, so later mutation of the returned state never
//!    reaches the template.
//! 2. `reset_state(keys)` restores exactly the requested keys to their
//!    creation-time values. A requested key that was never initialized is
//!    removed.
//! 3. Writing through a key view is observably the same as writing that key
//!    of the root map.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;

use atomslice_core::{
    DeepClone, FocusAtom, HydrateOptions, PrimitiveAtom, SliceState, Store, pick, prop,
};
use atomslice_runtime::{Hooks, Provider, Setter, create_provider};

use crate::names::SliceNames;
use crate::options::StoreOptions;

/// View over a single key. Reads `None` when the key is absent.
pub type KeyAtom<V> = FocusAtom<SliceState<V>, Option<V>, V>;

/// View over a set of keys. Reads only the picked keys that are present.
pub type KeysAtom<V> = FocusAtom<SliceState<V>, SliceState<V>>;

struct SliceInner<V> {
    names: SliceNames,
    store: Store,
    atom: PrimitiveAtom<SliceState<V>>,
    provider: Provider,
    by_key: RefCell<HashMap<String, KeyAtom<V>>>,
    by_keys: RefCell<HashMap<BTreeSet<String>, KeysAtom<V>>>,
}

/// A keyed-map state container bound to one [`Store`].
///
/// Cloning creates a new handle to the **same** store generator.
pub struct SliceStore<V> {
    inner: Rc<SliceInner<V>>,
}

impl<V> Clone for SliceStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for SliceStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliceStore")
            .field("name", &self.inner.names.store)
            .field("store", &self.inner.store.id())
            .field("atom", &self.inner.atom)
            .finish()
    }
}

/// Build a [`SliceStore`]. Same as [`SliceStore::new`].
pub fn create_slice_store<V>(initial: &SliceState<V>, options: StoreOptions) -> SliceStore<V>
where
    V: Clone + PartialEq + DeepClone + 'static,
{
    SliceStore::new(initial, options)
}

impl<V> SliceStore<V>
where
    V: Clone + PartialEq + DeepClone + 'static,
{
    /// Create a store whose root starts as a deep copy of `initial`.
    #[must_use]
    pub fn new(initial: &SliceState<V>, options: StoreOptions) -> Self {
        let names = SliceNames::new(&options.name);
        let store = options.resolve_store();
        let atom = PrimitiveAtom::labeled(initial.deep_clone(), names.atom.clone());
        let provider = create_provider(&store);
        tracing::debug!(
            store = %store.id(),
            name = %names.store,
            keys = initial.len(),
            "slice store created"
        );
        Self {
            inner: Rc::new(SliceInner {
                names,
                store,
                atom,
                provider,
                by_key: RefCell::new(HashMap::new()),
                by_keys: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Snapshot of the listed keys, or of the whole state when `keys` is
    /// `None`.
    #[must_use]
    pub fn get_state(&self, keys: Option<&[&str]>) -> SliceState<V> {
        match keys {
            None => self.inner.store.get(&self.inner.atom),
            Some(keys) => self.inner.store.get(&self.keys_atom(keys)),
        }
    }

    /// Replace every key in `partial`, one key at a time, in map order.
    /// Keys not in `partial` are untouched.
    pub fn set_state(&self, partial: SliceState<V>) {
        for (key, value) in partial {
            self.set_state_by_key(&key, value);
        }
    }

    /// Restore keys to their creation-time values.
    ///
    /// `None`, an empty list, or a list covering every key of a non-empty
    /// initial map replaces the whole root in one write. Otherwise only the
    /// listed keys are restored; listed keys absent from the initial map are
    /// removed. An empty initial map never counts as covered.
    pub fn reset_state(&self, keys: Option<&[&str]>) {
        let initial = self.inner.atom.init();
        let keys = match keys {
            Some(keys) if !keys.is_empty() && !covers_all(initial, keys) => keys,
            _ => {
                tracing::debug!(
                    store = %self.inner.store.id(),
                    op = %self.inner.names.reset_state,
                    "reset all"
                );
                self.inner.store.set(&self.inner.atom, initial.deep_clone());
                return;
            }
        };

        tracing::debug!(
            store = %self.inner.store.id(),
            op = %self.inner.names.reset_state,
            keys = ?keys,
            "reset keys"
        );
        let (known, unknown): (Vec<&str>, Vec<&str>) =
            keys.iter().copied().partition(|k| initial.contains_key(*k));
        let restored: SliceState<V> = known
            .iter()
            .filter_map(|k| initial.get_key_value(*k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.set_state(restored.deep_clone());
        if !unknown.is_empty() {
            self.inner.store.set(&self.keys_atom(&unknown), SliceState::new());
        }
    }

    /// Current value of `key`, or `None` if absent.
    #[must_use]
    pub fn get_state_by_key(&self, key: &str) -> Option<V> {
        self.inner.store.get(&self.key_atom(key))
    }

    /// Replace (or insert) `key`.
    pub fn set_state_by_key(&self, key: &str, value: V) {
        tracing::trace!(op = %self.inner.names.set_state_by_key, key, "slice write");
        self.inner.store.set(&self.key_atom(key), value);
    }

    /// Read the listed keys and subscribe to them.
    pub fn use_state(&self, cx: &mut Hooks<'_>, keys: &[&str]) -> (SliceState<V>, Setter<KeysAtom<V>>) {
        let atom = self.use_keys_atom(cx, keys);
        cx.use_atom(&atom)
    }

    pub fn use_get_state(&self, cx: &mut Hooks<'_>, keys: &[&str]) -> SliceState<V> {
        let atom = self.use_keys_atom(cx, keys);
        cx.use_atom_value(&atom)
    }

    pub fn use_set_state(&self, cx: &mut Hooks<'_>, keys: &[&str]) -> Setter<KeysAtom<V>> {
        let atom = self.use_keys_atom(cx, keys);
        cx.use_set_atom(&atom)
    }

    /// Read one key and subscribe to it. Writes to other keys do not
    /// invalidate the component.
    pub fn use_state_by_key(&self, cx: &mut Hooks<'_>, key: &str) -> (Option<V>, Setter<KeyAtom<V>>) {
        let atom = self.use_key_atom(cx, key);
        cx.use_atom(&atom)
    }

    pub fn use_get_state_by_key(&self, cx: &mut Hooks<'_>, key: &str) -> Option<V> {
        let atom = self.use_key_atom(cx, key);
        cx.use_atom_value(&atom)
    }

    pub fn use_set_state_by_key(&self, cx: &mut Hooks<'_>, key: &str) -> Setter<KeyAtom<V>> {
        let atom = self.use_key_atom(cx, key);
        cx.use_set_atom(&atom)
    }

    /// Seed the keys of `partial` on this component's first render.
    ///
    /// A key is skipped if it was already hydrated or written in this store.
    pub fn use_hydrate(&self, cx: &mut Hooks<'_>, partial: SliceState<V>) {
        self.use_hydrate_with(cx, partial, HydrateOptions::default());
    }

    /// [`use_hydrate`](Self::use_hydrate) with explicit options.
    pub fn use_hydrate_with(&self, cx: &mut Hooks<'_>, partial: SliceState<V>, options: HydrateOptions) {
        cx.use_hydrate(&self.inner.store, options, |h| {
            for (key, value) in partial {
                h.atom(&self.key_atom(&key), value);
            }
        });
    }

    /// Memoized view over `key`.
    #[must_use]
    pub fn key_atom(&self, key: &str) -> KeyAtom<V> {
        self.inner
            .by_key
            .borrow_mut()
            .entry(key.to_owned())
            .or_insert_with(|| FocusAtom::new(&self.inner.atom, prop(key)))
            .clone()
    }

    /// Memoized view over a key set. Order and duplicates in `keys` do not
    /// matter.
    #[must_use]
    pub fn keys_atom<K: AsRef<str>>(&self, keys: &[K]) -> KeysAtom<V> {
        self.keys_atom_for(keys.iter().map(|k| k.as_ref().to_owned()).collect())
    }

    fn keys_atom_for(&self, set: BTreeSet<String>) -> KeysAtom<V> {
        self.inner
            .by_keys
            .borrow_mut()
            .entry(set)
            .or_insert_with_key(|set| {
                let keys: Vec<&String> = set.iter().collect();
                FocusAtom::new(&self.inner.atom, pick(&keys))
            })
            .clone()
    }

    fn use_key_atom(&self, cx: &mut Hooks<'_>, key: &str) -> KeyAtom<V> {
        cx.use_memo_with(key.to_owned(), |key| self.key_atom(key))
    }

    fn use_keys_atom(&self, cx: &mut Hooks<'_>, keys: &[&str]) -> KeysAtom<V> {
        let set: BTreeSet<String> = keys.iter().map(|k| (*k).to_owned()).collect();
        cx.use_memo_with(set, |set| self.keys_atom_for(set.clone()))
    }

    /// A provider that scopes hooks to this store.
    #[must_use]
    pub fn provider(&self) -> &Provider {
        &self.inner.provider
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// The root atom.
    #[must_use]
    pub fn atom(&self) -> &PrimitiveAtom<SliceState<V>> {
        &self.inner.atom
    }

    #[must_use]
    pub fn names(&self) -> &SliceNames {
        &self.inner.names
    }
}

fn covers_all<V>(initial: &SliceState<V>, keys: &[&str]) -> bool {
    !initial.is_empty() && initial.keys().all(|k| keys.contains(&k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomslice_core::Atom;
    use atomslice_runtime::Component;

    fn map(pairs: &[(&str, i32)]) -> SliceState<i32> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
    }

    fn fresh(initial: &SliceState<i32>) -> SliceStore<i32> {
        SliceStore::new(initial, StoreOptions::new().name("test").store(Store::new()))
    }

    #[test]
    fn reads_whole_and_subset() {
        let s = fresh(&map(&[("a", 1), ("b", 2), ("c", 3)]));
        assert_eq!(s.get_state(None), map(&[("a", 1), ("b", 2), ("c", 3)]));
        assert_eq!(s.get_state(Some(&["c", "a"][..])), map(&[("a", 1), ("c", 3)]));
        assert_eq!(s.get_state(Some(&["zzz"][..])), SliceState::new());
    }

    #[test]
    fn set_state_touches_only_listed_keys() {
        let s = fresh(&map(&[("a", 1), ("b", 2)]));
        s.set_state(map(&[("b", 20), ("n", 5)]));
        assert_eq!(s.get_state(None), map(&[("a", 1), ("b", 20), ("n", 5)]));
    }

    #[test]
    fn by_key_roundtrip() {
        let s = fresh(&map(&[("a", 1)]));
        assert_eq!(s.get_state_by_key("a"), Some(1));
        assert_eq!(s.get_state_by_key("missing"), None);
        s.set_state_by_key("a", 7);
        assert_eq!(s.get_state(None), map(&[("a", 7)]));
    }

    #[test]
    fn reset_all_variants() {
        let init = map(&[("a", 1), ("b", 2)]);
        for keys in [None, Some(&[][..]), Some(&["b", "a"][..])] {
            let s = fresh(&init);
            s.set_state(map(&[("a", 10), ("b", 20), ("extra", 0)]));
            s.reset_state(keys);
            assert_eq!(s.get_state(None), init);
        }
    }

    #[test]
    fn reset_subset_leaves_others() {
        let s = fresh(&map(&[("a", 1), ("b", 2), ("c", 3)]));
        s.set_state(map(&[("a", 10), ("b", 20), ("c", 30)]));
        s.reset_state(Some(&["a", "c"][..]));
        assert_eq!(s.get_state(None), map(&[("a", 1), ("b", 20), ("c", 3)]));
    }

    #[test]
    fn reset_removes_uninitialized_key() {
        let s = fresh(&map(&[("a", 1), ("b", 2)]));
        s.set_state_by_key("x", 9);
        s.set_state_by_key("a", 5);
        s.reset_state(Some(&["x", "a"][..]));
        assert_eq!(s.get_state_by_key("x"), None);
        assert_eq!(s.get_state(None), map(&[("a", 1), ("b", 2)]));
    }

    #[test]
    fn reset_with_empty_template_only_touches_requested_keys() {
        let s = fresh(&SliceState::new());
        s.set_state_by_key("x", 1);
        s.set_state_by_key("y", 2);
        s.reset_state(Some(&["x"][..]));
        assert_eq!(s.get_state_by_key("x"), None);
        assert_eq!(s.get_state_by_key("y"), Some(2));

        s.reset_state(None);
        assert_eq!(s.get_state(None), SliceState::new());
    }

    #[test]
    fn creation_deep_copies_template() {
        let mut init: SliceState<Vec<i32>> = SliceState::new();
        init.insert("xs".into(), vec![1]);
        let s = SliceStore::new(&init, StoreOptions::new().store(Store::new()));
        if let Some(xs) = init.get_mut("xs") {
            xs.push(2);
        }
        assert_eq!(s.get_state_by_key("xs"), Some(vec![1]));

        s.set_state_by_key("xs", vec![5, 6]);
        s.reset_state(None);
        assert_eq!(s.get_state_by_key("xs"), Some(vec![1]));
    }

    #[test]
    fn views_are_memoized() {
        let s = fresh(&map(&[("a", 1), ("b", 2)]));
        assert_eq!(s.key_atom("a").id(), s.key_atom("a").id());
        assert_ne!(s.key_atom("a").id(), s.key_atom("b").id());
        assert_eq!(s.keys_atom(&["a", "b"]).id(), s.keys_atom(&["b", "a", "a"]).id());
    }

    #[test]
    fn stores_are_isolated() {
        let init = map(&[("a", 1)]);
        let s1 = fresh(&init);
        let s2 = fresh(&init);
        s1.set_state_by_key("a", 100);
        assert_eq!(s2.get_state_by_key("a"), Some(1));
    }

    #[test]
    fn key_hook_ignores_other_keys() {
        let s = fresh(&map(&[("a", 1), ("b", 2)]));
        let c = Component::new("a-reader");
        let v = s.provider().render(|| c.render(|cx| s.use_get_state_by_key(cx, "a")));
        assert_eq!(v, Some(1));

        s.set_state_by_key("b", 3);
        assert!(!c.needs_render());
        s.set_state_by_key("a", 2);
        assert!(c.needs_render());

        for _ in 0..3 {
            s.provider().render(|| c.render(|cx| s.use_get_state_by_key(cx, "a")));
        }
        assert_eq!(c.subscribe_count(), 1);
    }

    #[test]
    fn keys_hook_reads_and_writes() {
        let s = fresh(&map(&[("a", 1), ("b", 2), ("c", 3)]));
        let c = Component::new("ab");
        let (value, set) = s.provider().render(|| c.render(|cx| s.use_state(cx, &["a", "b"])));
        assert_eq!(value, map(&[("a", 1), ("b", 2)]));

        set.update(|prev| prev.into_iter().map(|(k, v)| (k, v * 10)).collect());
        assert_eq!(s.get_state(None), map(&[("a", 10), ("b", 20), ("c", 3)]));
        assert!(c.needs_render());
    }

    #[test]
    fn setter_hook_does_not_subscribe() {
        let s = fresh(&map(&[("a", 1)]));
        let c = Component::new("writer");
        let set = s.provider().render(|| c.render(|cx| s.use_set_state_by_key(cx, "a")));
        set.set(4);
        assert_eq!(s.get_state_by_key("a"), Some(4));
        assert!(!c.needs_render());
        assert_eq!(c.subscribe_count(), 0);
    }

    #[test]
    fn hydrate_applies_once() {
        let s = fresh(&map(&[("count", 0)]));
        let c = Component::new("page");
        for seed in [100, 200] {
            s.provider().render(|| c.render(|cx| s.use_hydrate(cx, map(&[("count", seed)]))));
        }
        assert_eq!(s.get_state_by_key("count"), Some(100));

        let other = Component::new("other");
        s.provider().render(|| other.render(|cx| s.use_hydrate(cx, map(&[("count", 300)]))));
        assert_eq!(s.get_state_by_key("count"), Some(100));
    }

    #[test]
    fn hydrate_does_not_clobber_writes() {
        let s = fresh(&map(&[("count", 0)]));
        s.set_state_by_key("count", 5);
        let c = Component::new("page");
        c.render(|cx| s.use_hydrate(cx, map(&[("count", 100)])));
        assert_eq!(s.get_state_by_key("count"), Some(5));

        let forced = Component::new("forced");
        forced.render(|cx| {
            s.use_hydrate_with(cx, map(&[("count", 100)]), HydrateOptions::new().force(true));
        });
        assert_eq!(s.get_state_by_key("count"), Some(100));
    }

    #[test]
    fn names_follow_prefix() {
        let s = fresh(&map(&[]));
        assert_eq!(s.names().use_state_by_key, "useTestStateByKey");
        assert_eq!(s.atom().label(), Some("testAtom"));
    }
}
