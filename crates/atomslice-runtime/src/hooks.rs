#![forbid(unsafe_code)]

//! Hook cursor for one render pass.
//!
//! Hooks are matched to slots by call order, as in any hook-based UI
//! framework. Each hook kind stores its own slot type; if a slot's type does
//! not match the hook now calling it (the call order changed between
//! renders), the old slot is dropped and a fresh one is created.

use std::any::Any;

use atomslice_core::{Atom, AtomId, HydrateOptions, Store, StoreId, Subscription, WritableAtom};

use crate::component::Component;
use crate::setter::Setter;

struct MemoSlot<T> {
    value: T,
}

struct DepsSlot<D, T> {
    deps: D,
    value: T,
}

struct WatchSlot {
    atom: AtomId,
    store: StoreId,
    _subscription: Subscription,
}

struct HydratedSlot;

/// Hook cursor handed to a component's render body.
pub struct Hooks<'a> {
    component: &'a Component,
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
    store: Store,
}

impl<'a> Hooks<'a> {
    pub(crate) fn new(component: &'a Component, slots: Vec<Box<dyn Any>>, store: Store) -> Self {
        Self {
            component,
            slots,
            cursor: 0,
            store,
        }
    }

    /// The store hooks resolve against during this render.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn component(&self) -> &Component {
        self.component
    }

    /// A value built once per component lifetime.
    pub fn use_memo<T: Clone + 'static>(&mut self, init: impl FnOnce() -> T) -> T {
        let (index, slot) = self.enter::<MemoSlot<T>>();
        let slot = slot.unwrap_or_else(|| Box::new(MemoSlot { value: init() }));
        let value = slot.value.clone();
        self.leave(index, slot);
        value
    }

    /// A value rebuilt only when `deps` changes.
    pub fn use_memo_with<D, T>(&mut self, deps: D, init: impl FnOnce(&D) -> T) -> T
    where
        D: PartialEq + 'static,
        T: Clone + 'static,
    {
        let (index, slot) = self.enter::<DepsSlot<D, T>>();
        let slot = match slot {
            Some(slot) if slot.deps == deps => slot,
            _ => {
                let value = init(&deps);
                Box::new(DepsSlot { deps, value })
            }
        };
        let value = slot.value.clone();
        self.leave(index, slot);
        value
    }

    /// Read `atom` and subscribe this component to its changes.
    ///
    /// The subscription is kept while later renders pass an atom with the
    /// same identity; a different atom (or store) replaces it.
    pub fn use_atom_value<A: Atom>(&mut self, atom: &A) -> A::Value {
        let (index, slot) = self.enter::<WatchSlot>();
        let atom_id = atom.id();
        let store_id = self.store.id();
        let slot = match slot {
            Some(slot) if slot.atom == atom_id && slot.store == store_id => slot,
            _ => {
                let dirty = self.component.dirty_flag();
                let subscription = self.store.subscribe(atom, move |_| dirty.set(true));
                self.component.note_subscribe();
                tracing::trace!(
                    component = self.component.name(),
                    atom = %atom_id,
                    store = %store_id,
                    "hook subscribed"
                );
                Box::new(WatchSlot {
                    atom: atom_id,
                    store: store_id,
                    _subscription: subscription,
                })
            }
        };
        self.leave(index, slot);
        self.store.get(atom)
    }

    /// A setter for `atom`. Does not subscribe.
    pub fn use_set_atom<A: WritableAtom + Clone>(&mut self, atom: &A) -> Setter<A> {
        Setter::new(atom.clone(), self.store.clone())
    }

    /// Read, subscribe, and get a setter.
    pub fn use_atom<A: WritableAtom + Clone>(&mut self, atom: &A) -> (A::Value, Setter<A>) {
        let value = self.use_atom_value(atom);
        (value, self.use_set_atom(atom))
    }

    /// Seed atoms in `store` on the first render only.
    ///
    /// Each [`Hydration::atom`] call goes through [`Store::hydrate`], so the
    /// store's ledgers still guard against clobbering across components.
    pub fn use_hydrate(
        &mut self,
        store: &Store,
        options: HydrateOptions,
        seed: impl FnOnce(&mut Hydration<'_>),
    ) {
        let (index, slot) = self.enter::<HydratedSlot>();
        let slot = match slot {
            Some(slot) => slot,
            None => {
                let mut hydration = Hydration {
                    store,
                    options,
                    applied: 0,
                    skipped: 0,
                };
                seed(&mut hydration);
                tracing::debug!(
                    component = self.component.name(),
                    applied = hydration.applied,
                    skipped = hydration.skipped,
                    "hydrated"
                );
                Box::new(HydratedSlot)
            }
        };
        self.leave(index, slot);
    }

    /// Claim the next slot, downcast to `T`. `None` means the slot is new or
    /// held a different hook kind.
    fn enter<T: 'static>(&mut self) -> (usize, Option<Box<T>>) {
        let index = self.cursor;
        self.cursor += 1;
        if index >= self.slots.len() {
            self.slots.push(Box::new(()));
            return (index, None);
        }
        let taken = std::mem::replace(&mut self.slots[index], Box::new(()));
        match taken.downcast::<T>() {
            Ok(slot) => (index, Some(slot)),
            Err(_) => {
                tracing::warn!(
                    component = self.component.name(),
                    slot = index,
                    "hook order changed between renders; slot reset"
                );
                (index, None)
            }
        }
    }

    fn leave<T: 'static>(&mut self, index: usize, slot: Box<T>) {
        self.slots[index] = slot;
    }

    /// Drop the slots the body no longer reached. The rest go back to the
    /// component when `self` drops.
    pub(crate) fn finish(mut self) {
        if self.cursor < self.slots.len() {
            tracing::warn!(
                component = self.component.name(),
                used = self.cursor,
                held = self.slots.len(),
                "fewer hooks than previous render; dropping trailing slots"
            );
            self.slots.truncate(self.cursor);
        }
    }
}

/// Slots return to the component even when the render body unwinds.
impl Drop for Hooks<'_> {
    fn drop(&mut self) {
        self.component.restore_slots(std::mem::take(&mut self.slots));
    }
}

/// Collects atom seeds inside [`Hooks::use_hydrate`].
pub struct Hydration<'s> {
    store: &'s Store,
    options: HydrateOptions,
    applied: usize,
    skipped: usize,
}

impl Hydration<'_> {
    /// Seed `atom` with `value` unless the store's ledgers say otherwise.
    pub fn atom<A: WritableAtom>(&mut self, atom: &A, value: A::Input) -> &mut Self {
        if self.store.hydrate(atom, value, self.options) {
            self.applied += 1;
        } else {
            self.skipped += 1;
        }
        self
    }

    #[must_use]
    pub fn applied(&self) -> usize {
        self.applied
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
