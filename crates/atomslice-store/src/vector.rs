#![forbid(unsafe_code)]

//! Index-addressed store generator.
//!
//! Same shape as [`SliceStore`](crate::SliceStore) for a `Vec<T>` root.
//! Element views ([`ItemAtom`]) are memoized per index, so a component
//! observing element `i` is not invalidated by writes to element `j`.
//!
//! Reset is whole-sequence only.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use atomslice_core::{DeepClone, FocusAtom, HydrateOptions, PrimitiveAtom, Store, at};
use atomslice_runtime::{Hooks, Provider, Setter, create_provider};

use crate::names::VecNames;
use crate::options::StoreOptions;

/// View over one element. Reads `None` when out of range.
pub type ItemAtom<T> = FocusAtom<Vec<T>, Option<T>, T>;

struct VecInner<T> {
    names: VecNames,
    store: Store,
    atom: PrimitiveAtom<Vec<T>>,
    provider: Provider,
    items: RefCell<HashMap<usize, ItemAtom<T>>>,
}

/// An ordered-sequence state container bound to one [`Store`].
pub struct VecStore<T> {
    inner: Rc<VecInner<T>>,
}

impl<T> Clone for VecStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for VecStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecStore")
            .field("name", &self.inner.names.store)
            .field("store", &self.inner.store.id())
            .field("atom", &self.inner.atom)
            .finish()
    }
}

/// Build a [`VecStore`]. Same as [`VecStore::new`].
pub fn create_vec_store<T>(initial: &[T], options: StoreOptions) -> VecStore<T>
where
    T: Clone + PartialEq + DeepClone + 'static,
{
    VecStore::new(initial, options)
}

impl<T> VecStore<T>
where
    T: Clone + PartialEq + DeepClone + 'static,
{
    #[must_use]
    pub fn new(initial: &[T], options: StoreOptions) -> Self {
        let names = VecNames::new(&options.name);
        let store = options.resolve_store();
        let seed: Vec<T> = initial.iter().map(T::deep_clone).collect();
        let atom = PrimitiveAtom::labeled(seed, names.atom.clone());
        let provider = create_provider(&store);
        tracing::debug!(
            store = %store.id(),
            name = %names.store,
            len = initial.len(),
            "vec store created"
        );
        Self {
            inner: Rc::new(VecInner {
                names,
                store,
                atom,
                provider,
                items: RefCell::new(HashMap::new()),
            }),
        }
    }

    #[must_use]
    pub fn get_state(&self) -> Vec<T> {
        self.inner.store.get(&self.inner.atom)
    }

    /// Replace the whole sequence.
    pub fn set_state(&self, seq: Vec<T>) {
        self.inner.store.set(&self.inner.atom, seq);
    }

    /// Restore the creation-time sequence.
    pub fn reset_state(&self) {
        tracing::debug!(
            store = %self.inner.store.id(),
            op = %self.inner.names.reset_state,
            "reset all"
        );
        self.inner
            .store
            .set(&self.inner.atom, self.inner.atom.init().deep_clone());
    }

    #[must_use]
    pub fn get_item(&self, index: usize) -> Option<T> {
        self.inner.store.get(&self.item_atom(index))
    }

    /// Replace element `index`. Out of range leaves the sequence unchanged.
    pub fn set_item(&self, index: usize, value: T) {
        tracing::trace!(op = %self.inner.names.set_item, index, "vec write");
        self.inner.store.set(&self.item_atom(index), value);
    }

    pub fn use_state(&self, cx: &mut Hooks<'_>) -> (Vec<T>, Setter<PrimitiveAtom<Vec<T>>>) {
        cx.use_atom(&self.inner.atom)
    }

    pub fn use_get_state(&self, cx: &mut Hooks<'_>) -> Vec<T> {
        cx.use_atom_value(&self.inner.atom)
    }

    pub fn use_set_state(&self, cx: &mut Hooks<'_>) -> Setter<PrimitiveAtom<Vec<T>>> {
        cx.use_set_atom(&self.inner.atom)
    }

    /// Read element `index` and subscribe to it.
    pub fn use_item(&self, cx: &mut Hooks<'_>, index: usize) -> (Option<T>, Setter<ItemAtom<T>>) {
        let atom = self.use_item_atom(cx, index);
        cx.use_atom(&atom)
    }

    pub fn use_get_item(&self, cx: &mut Hooks<'_>, index: usize) -> Option<T> {
        let atom = self.use_item_atom(cx, index);
        cx.use_atom_value(&atom)
    }

    pub fn use_set_item(&self, cx: &mut Hooks<'_>, index: usize) -> Setter<ItemAtom<T>> {
        let atom = self.use_item_atom(cx, index);
        cx.use_set_atom(&atom)
    }

    /// Seed the whole sequence on this component's first render, unless the
    /// root was already hydrated or written.
    pub fn use_hydrate(&self, cx: &mut Hooks<'_>, seq: Vec<T>) {
        self.use_hydrate_with(cx, seq, HydrateOptions::default());
    }

    pub fn use_hydrate_with(&self, cx: &mut Hooks<'_>, seq: Vec<T>, options: HydrateOptions) {
        cx.use_hydrate(&self.inner.store, options, |h| {
            h.atom(&self.inner.atom, seq);
        });
    }

    /// Memoized view over element `index`.
    #[must_use]
    pub fn item_atom(&self, index: usize) -> ItemAtom<T> {
        self.inner
            .items
            .borrow_mut()
            .entry(index)
            .or_insert_with(|| FocusAtom::new(&self.inner.atom, at(index)))
            .clone()
    }

    fn use_item_atom(&self, cx: &mut Hooks<'_>, index: usize) -> ItemAtom<T> {
        cx.use_memo_with(index, |index| self.item_atom(*index))
    }

    #[must_use]
    pub fn provider(&self) -> &Provider {
        &self.inner.provider
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn atom(&self) -> &PrimitiveAtom<Vec<T>> {
        &self.inner.atom
    }

    #[must_use]
    pub fn names(&self) -> &VecNames {
        &self.inner.names
    }
}
