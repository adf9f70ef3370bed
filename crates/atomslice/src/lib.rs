#![forbid(unsafe_code)]

//! atomslice public facade crate.
//!
//! Fine-grained reactive state containers built on a small atom engine.
//! A [`SliceStore`] holds a keyed map, a [`VecStore`] an ordered sequence;
//! both hand out per-key / per-index views so consumers re-render only when
//! the part they read changes.
//!
//! ```
//! use atomslice::prelude::*;
//!
//! let initial: SliceState<i64> = [("count".to_string(), 0)].into_iter().collect();
//! let counter = create_slice_store(&initial, StoreOptions::new().name("counter").store(Store::new()));
//!
//! counter.set_state_by_key("count", 5);
//! assert_eq!(counter.get_state_by_key("count"), Some(5));
//!
//! counter.reset_state(None);
//! assert_eq!(counter.get_state(None), initial);
//! ```

pub use atomslice_core::{
    Atom, AtomId, DeepClone, Focus, FocusAtom, HydrateOptions, Observable, PrimitiveAtom,
    Segment, SliceState, SlotKey, Store, StoreId, StoreStats, Subscription, Value,
    WritableAtom, at, capitalize_first_letter, clone_deep, default_store, pick, prop,
};
pub use atomslice_runtime::{
    Component, ComponentId, Hooks, Hydration, Provider, Setter, create_provider, current_store,
};
pub use atomslice_store::{
    ItemAtom, KeyAtom, KeysAtom, SliceNames, SliceStore, StoreOptions, VecNames, VecStore,
    create_slice_store, create_vec_store,
};

pub mod prelude {
    pub use atomslice_core as core;
    pub use atomslice_runtime as runtime;
    pub use atomslice_store as store;

    pub use crate::{
        Component, DeepClone, Hooks, HydrateOptions, Provider, Setter, SliceState, SliceStore,
        Store, StoreOptions, Value, VecStore, create_provider, create_slice_store,
        create_vec_store, default_store,
    };
}
