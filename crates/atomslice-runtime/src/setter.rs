#![forbid(unsafe_code)]

//! Write handles returned by setter hooks.

use std::fmt;

use atomslice_core::{Store, WritableAtom};

/// A writable atom paired with the store it was resolved against.
///
/// Holding a `Setter` does not subscribe to anything, so writing through it
/// never invalidates the component that obtained it unless that component
/// also reads the atom.
pub struct Setter<A> {
    atom: A,
    store: Store,
}

impl<A: Clone> Clone for Setter<A> {
    fn clone(&self) -> Self {
        Self {
            atom: self.atom.clone(),
            store: self.store.clone(),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Setter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter")
            .field("atom", &self.atom)
            .field("store", &self.store.id())
            .finish()
    }
}

impl<A: WritableAtom> Setter<A> {
    #[must_use]
    pub fn new(atom: A, store: Store) -> Self {
        Self { atom, store }
    }

    /// Replace the value.
    pub fn set(&self, value: A::Input) {
        self.store.set(&self.atom, value);
    }

    /// Compute the next value from the previous one.
    pub fn update(&self, f: impl FnOnce(A::Value) -> A::Input) {
        self.store.update(&self.atom, f);
    }

    #[must_use]
    pub fn atom(&self) -> &A {
        &self.atom
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }
}
