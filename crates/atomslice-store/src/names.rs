#![forbid(unsafe_code)]

//! Synthesized accessor names.
//!
//! Stores expose fixed method names (`get_state`, `use_state_by_key`, ...).
//! The camel-case names below are derived from the store's `name` the same
//! way for every store, and are used as labels in tracing output and
//! diagnostics. An empty name collapses to the bare template (`getState`).

use atomslice_core::capitalize_first_letter;

/// Accessor names for a slice store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceNames {
    pub get_state: String,
    pub set_state: String,
    pub reset_state: String,
    pub get_state_by_key: String,
    pub set_state_by_key: String,
    pub use_state: String,
    pub use_get_state: String,
    pub use_set_state: String,
    pub use_state_by_key: String,
    pub use_get_state_by_key: String,
    pub use_set_state_by_key: String,
    pub use_hydrate: String,
    pub provider: String,
    pub store: String,
    pub atom: String,
}

impl SliceNames {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let cap = capitalize_first_letter(name);
        Self {
            get_state: format!("get{cap}State"),
            set_state: format!("set{cap}State"),
            reset_state: format!("reset{cap}State"),
            get_state_by_key: format!("get{cap}StateByKey"),
            set_state_by_key: format!("set{cap}StateByKey"),
            use_state: format!("use{cap}State"),
            use_get_state: format!("useGet{cap}State"),
            use_set_state: format!("useSet{cap}State"),
            use_state_by_key: format!("use{cap}StateByKey"),
            use_get_state_by_key: format!("useGet{cap}StateByKey"),
            use_set_state_by_key: format!("useSet{cap}StateByKey"),
            use_hydrate: format!("use{cap}Hydrate"),
            provider: format!("{cap}Provider"),
            store: format!("{name}Store"),
            atom: format!("{name}Atom"),
        }
    }

    /// Every name, in declaration order.
    #[must_use]
    pub fn all(&self) -> [&str; 15] {
        [
            self.get_state.as_str(),
            self.set_state.as_str(),
            self.reset_state.as_str(),
            self.get_state_by_key.as_str(),
            self.set_state_by_key.as_str(),
            self.use_state.as_str(),
            self.use_get_state.as_str(),
            self.use_set_state.as_str(),
            self.use_state_by_key.as_str(),
            self.use_get_state_by_key.as_str(),
            self.use_set_state_by_key.as_str(),
            self.use_hydrate.as_str(),
            self.provider.as_str(),
            self.store.as_str(),
            self.atom.as_str(),
        ]
    }
}

/// Accessor names for a vector store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VecNames {
    pub get_state: String,
    pub set_state: String,
    pub reset_state: String,
    pub get_item: String,
    pub set_item: String,
    pub use_state: String,
    pub use_get_state: String,
    pub use_set_state: String,
    pub use_item: String,
    pub use_get_item: String,
    pub use_set_item: String,
    pub use_hydrate: String,
    pub provider: String,
    pub store: String,
    pub atom: String,
}

impl VecNames {
    #[must_use]
    pub fn new(name: &str) -> Self {
        let cap = capitalize_first_letter(name);
        Self {
            get_state: format!("get{cap}State"),
            set_state: format!("set{cap}State"),
            reset_state: format!("reset{cap}State"),
            get_item: format!("get{cap}Item"),
            set_item: format!("set{cap}Item"),
            use_state: format!("use{cap}State"),
            use_get_state: format!("useGet{cap}State"),
            use_set_state: format!("useSet{cap}State"),
            use_item: format!("use{cap}Item"),
            use_get_item: format!("useGet{cap}Item"),
            use_set_item: format!("useSet{cap}Item"),
            use_hydrate: format!("use{cap}Hydrate"),
            provider: format!("{cap}Provider"),
            store: format!("{name}Store"),
            atom: format!("{name}Atom"),
        }
    }

    /// Every name, in declaration order.
    #[must_use]
    pub fn all(&self) -> [&str; 15] {
        [
            self.get_state.as_str(),
            self.set_state.as_str(),
            self.reset_state.as_str(),
            self.get_item.as_str(),
            self.set_item.as_str(),
            self.use_state.as_str(),
            self.use_get_state.as_str(),
            self.use_set_state.as_str(),
            self.use_item.as_str(),
            self.use_get_item.as_str(),
            self.use_set_item.as_str(),
            self.use_hydrate.as_str(),
            self.provider.as_str(),
            self.store.as_str(),
            self.atom.as_str(),
        ]
    }
}
