#![forbid(unsafe_code)]

//! Construction options shared by the slice and vector stores.

use atomslice_core::{Store, default_store};

/// Options for [`SliceStore::new`](crate::SliceStore::new) and
/// [`VecStore::new`](crate::VecStore::new).
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Prefix for the synthesized accessor names. Empty by default.
    pub name: String,
    /// Store the generator binds to. `None` selects the thread's default store.
    pub store: Option<Store>,
}

impl StoreOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name prefix.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Bind to an explicit store.
    #[must_use]
    pub fn store(mut self, store: Store) -> Self {
        self.store = Some(store);
        self
    }

    pub(crate) fn resolve_store(&self) -> Store {
        self.store.clone().unwrap_or_else(default_store)
    }
}
