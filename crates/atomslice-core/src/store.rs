#![forbid(unsafe_code)]

//! Stores: isolated universes of atom state.
//!
//! A [`Store`] maps atom identities to realized cells. The same atom read
//! through two stores yields two independent values. Cells are created
//! lazily, seeded from a deep copy of the atom's initial value.
//!
//! # Default store
//!
//! [`default_store()`] returns the thread's ambient store. It is created on
//! first use and lives until the thread exits; there is no teardown. Callers
//! wanting isolation construct their own `Store` and pass it explicitly.
//!
//! # Hydration
//!
//! Each store keeps two ledgers of [`SlotKey`]s: slots written through
//! [`Store::set`] and slots seeded through [`Store::hydrate`]. Hydration is
//! non-forceful: a value is applied only if no overlapping slot appears in
//! either ledger. This keeps a remounted consumer from clobbering edits made
//! since the first render.
//!
//! # Tracing
//!
//! Writes and subscriptions emit `TRACE` events with `store` and `slot`
//! fields; hydration decisions emit `DEBUG` events.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::atom::{Atom, AtomId, PrimitiveAtom, SlotKey, WritableAtom};
use crate::clone::DeepClone;
use crate::reactive::{Observable, Subscription};

// ─── Store ID generation ─────────────────────────────────────────────────────

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique store identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreId(u64);

impl StoreId {
    fn next() -> Self {
        Self(NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}

// ─── Options / stats ─────────────────────────────────────────────────────────

/// Hydration behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HydrateOptions {
    /// Apply even if the slot was already hydrated or written.
    pub force: bool,
}

impl HydrateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bypass both ledgers. Overwrites client edits; use only when the
    /// incoming snapshot is known to be authoritative.
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// Diagnostic counters for one store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Realized root cells.
    pub cells: usize,
    /// Calls to [`Store::set`] (including no-op writes).
    pub writes: u64,
    /// Calls to [`Store::subscribe`].
    pub subscriptions: u64,
    /// Distinct slots in the write ledger.
    pub written_slots: usize,
    /// Distinct slots in the hydration ledger.
    pub hydrated_slots: usize,
}

// ─── Store ───────────────────────────────────────────────────────────────────

struct StoreInner {
    id: StoreId,
    label: Option<String>,
    /// AtomId -> `Observable<T>` for that atom's value type.
    cells: RefCell<HashMap<AtomId, Rc<dyn Any>>>,
    written: RefCell<HashSet<SlotKey>>,
    hydrated: RefCell<HashSet<SlotKey>>,
    writes: Cell<u64>,
    subscriptions: Cell<u64>,
}

/// An isolated universe of atom values.
///
/// Cloning a `Store` creates a new handle to the **same** universe.
#[derive(Clone)]
pub struct Store {
    inner: Rc<StoreInner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("cells", &self.inner.cells.borrow().len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Store {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Store {}

thread_local! {
    static DEFAULT_STORE: Store = Store::with_label("default");
}

/// The thread's ambient store, created on first use.
#[must_use]
pub fn default_store() -> Store {
    DEFAULT_STORE.with(Store::clone)
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    #[must_use]
    pub fn with_label(label: impl Into<String>) -> Self {
        Self::build(Some(label.into()))
    }

    fn build(label: Option<String>) -> Self {
        let id = StoreId::next();
        tracing::debug!(store = %id, label = label.as_deref(), "store created");
        Self {
            inner: Rc::new(StoreInner {
                id,
                label,
                cells: RefCell::new(HashMap::new()),
                written: RefCell::new(HashSet::new()),
                hydrated: RefCell::new(HashSet::new()),
                writes: Cell::new(0),
                subscriptions: Cell::new(0),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }

    /// Current value of `atom` in this store.
    pub fn get<A: Atom>(&self, atom: &A) -> A::Value {
        atom.read(self)
    }

    /// Write `value` through `atom`. Subscribers whose view changed are
    /// notified before this returns.
    pub fn set<A: WritableAtom>(&self, atom: &A, value: A::Input) {
        let slot = atom.slot();
        tracing::trace!(store = %self.inner.id, slot = %slot, "write");
        self.inner.writes.set(self.inner.writes.get() + 1);
        atom.write(self, value);
        self.inner.written.borrow_mut().insert(slot);
    }

    /// Read-modify-write through `atom`.
    pub fn update<A: WritableAtom>(&self, atom: &A, f: impl FnOnce(A::Value) -> A::Input) {
        let prev = self.get(atom);
        self.set(atom, f(prev));
    }

    /// Observe `atom`. The callback fires with the new value each time the
    /// atom's value changes, until the returned guard is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<A: Atom>(
        &self,
        atom: &A,
        callback: impl Fn(&A::Value) + 'static,
    ) -> Subscription {
        tracing::trace!(store = %self.inner.id, atom = %atom.id(), "subscribe");
        self.inner
            .subscriptions
            .set(self.inner.subscriptions.get() + 1);
        atom.watch(self, Box::new(callback))
    }

    /// Seed `atom` with `value` unless the slot was already hydrated or
    /// written (see the module docs). Returns whether the value was applied.
    pub fn hydrate<A: WritableAtom>(&self, atom: &A, value: A::Input, options: HydrateOptions) -> bool {
        let slot = atom.slot();
        if !options.force {
            if self.is_hydrated(&slot) {
                tracing::debug!(store = %self.inner.id, slot = %slot, "hydrate skipped: already hydrated");
                return false;
            }
            if self.is_written(&slot) {
                tracing::debug!(store = %self.inner.id, slot = %slot, "hydrate skipped: already written");
                return false;
            }
        }
        tracing::debug!(store = %self.inner.id, slot = %slot, force = options.force, "hydrate");
        atom.write(self, value);
        self.inner.hydrated.borrow_mut().insert(slot);
        true
    }

    /// Whether any write overlapping `slot` has gone through [`Store::set`].
    #[must_use]
    pub fn is_written(&self, slot: &SlotKey) -> bool {
        self.inner
            .written
            .borrow()
            .iter()
            .any(|w| w.overlaps(slot))
    }

    /// Whether any slot overlapping `slot` has been hydrated.
    #[must_use]
    pub fn is_hydrated(&self, slot: &SlotKey) -> bool {
        self.inner
            .hydrated
            .borrow()
            .iter()
            .any(|h| h.overlaps(slot))
    }

    #[must_use]
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            cells: self.inner.cells.borrow().len(),
            writes: self.inner.writes.get(),
            subscriptions: self.inner.subscriptions.get(),
            written_slots: self.inner.written.borrow().len(),
            hydrated_slots: self.inner.hydrated.borrow().len(),
        }
    }

    /// The realized cell for `atom`, creating it on first use.
    pub(crate) fn cell<T>(&self, atom: &PrimitiveAtom<T>) -> Observable<T>
    where
        T: Clone + PartialEq + DeepClone + 'static,
    {
        let id = atom.id();
        let existing = self.inner.cells.borrow().get(&id).cloned();
        if let Some(any) = existing {
            match any.downcast::<Observable<T>>() {
                Ok(cell) => return (*cell).clone(),
                Err(_) => {
                    tracing::error!(
                        store = %self.inner.id,
                        atom = %id,
                        "cell type does not match atom; reseeding"
                    );
                }
            }
        }
        let cell = Observable::new(atom.init().deep_clone());
        self.inner
            .cells
            .borrow_mut()
            .insert(id, Rc::new(cell.clone()));
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::FocusAtom;
    use crate::focus::{SliceState, prop};
    use std::cell::Cell;

    fn state() -> SliceState<i32> {
        [("count".to_string(), 0), ("time".to_string(), 0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn stores_are_isolated() {
        let atom = PrimitiveAtom::new(1);
        let a = Store::new();
        let b = Store::new();

        a.set(&atom, 5);
        assert_eq!(a.get(&atom), 5);
        assert_eq!(b.get(&atom), 1);
    }

    #[test]
    fn cells_are_lazy() {
        let store = Store::new();
        assert_eq!(store.stats().cells, 0);
        let atom = PrimitiveAtom::new(String::from("x"));
        let _ = store.get(&atom);
        assert_eq!(store.stats().cells, 1);
    }

    #[test]
    fn default_store_is_shared_per_thread() {
        let a = default_store();
        let b = default_store();
        assert_eq!(a, b);
        assert_eq!(a.label(), Some("default"));
        assert_ne!(a, Store::new());
    }

    #[test]
    fn cell_seed_is_deep_copied() {
        let shared = Rc::new(RefCell::new(vec![1]));
        let atom = PrimitiveAtom::new(Rc::clone(&shared));
        let store = Store::new();

        let stored = store.get(&atom);
        stored.borrow_mut().push(2);

        assert_eq!(*shared.borrow(), vec![1]);
    }

    #[test]
    fn update_reads_then_writes() {
        let store = Store::new();
        let atom = PrimitiveAtom::new(10);
        store.update(&atom, |v| v + 1);
        assert_eq!(store.get(&atom), 11);
    }

    #[test]
    fn subscription_sees_each_change() {
        let store = Store::new();
        let atom = PrimitiveAtom::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _sub = store.subscribe(&atom, move |v| seen_clone.borrow_mut().push(*v));

        store.set(&atom, 1);
        store.set(&atom, 1);
        store.set(&atom, 2);

        assert_eq!(*seen.borrow(), vec![1, 2]);
        assert_eq!(store.stats().writes, 3);
        assert_eq!(store.stats().subscriptions, 1);
    }

    #[test]
    fn hydrate_applies_once() {
        let store = Store::new();
        let root = PrimitiveAtom::new(state());
        let count = FocusAtom::new(&root, prop::<i32>("count"));

        assert!(store.hydrate(&count, 100, HydrateOptions::default()));
        assert!(!store.hydrate(&count, 200, HydrateOptions::default()));
        assert_eq!(store.get(&count), Some(100));
    }

    #[test]
    fn hydrate_never_clobbers_a_write() {
        let store = Store::new();
        let root = PrimitiveAtom::new(state());
        let count = FocusAtom::new(&root, prop::<i32>("count"));

        store.set(&count, 7);
        assert!(!store.hydrate(&count, 100, HydrateOptions::default()));
        assert_eq!(store.get(&count), Some(7));
    }

    #[test]
    fn hydrate_is_per_slot() {
        let store = Store::new();
        let root = PrimitiveAtom::new(state());
        let count = FocusAtom::new(&root, prop::<i32>("count"));
        let time = FocusAtom::new(&root, prop::<i32>("time"));

        store.set(&count, 7);
        assert!(store.hydrate(&time, 3, HydrateOptions::default()));
        assert_eq!(store.get(&time), Some(3));
    }

    #[test]
    fn whole_root_write_blocks_key_hydration() {
        let store = Store::new();
        let root = PrimitiveAtom::new(state());
        let count = FocusAtom::new(&root, prop::<i32>("count"));

        store.set(&root, state());
        assert!(!store.hydrate(&count, 1, HydrateOptions::default()));
    }

    #[test]
    fn forced_hydrate_overwrites() {
        let store = Store::new();
        let atom = PrimitiveAtom::new(0);
        store.set(&atom, 5);
        assert!(store.hydrate(&atom, 9, HydrateOptions::new().force(true)));
        assert_eq!(store.get(&atom), 9);
    }

    #[test]
    fn hydration_does_not_count_as_write() {
        let store = Store::new();
        let atom = PrimitiveAtom::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = store.subscribe(&atom, move |_| hits_clone.set(hits_clone.get() + 1));

        store.hydrate(&atom, 4, HydrateOptions::default());
        assert_eq!(hits.get(), 1);
        assert!(!store.is_written(&atom.slot()));
        assert!(store.is_hydrated(&atom.slot()));
    }
}
