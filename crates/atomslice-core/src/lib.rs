#![forbid(unsafe_code)]

//! Core: reactive cells, atoms, stores, focus views, and value utilities.
//!
//! Everything here is single-threaded. Handles are `Rc`-based and cheap to
//! clone; a clone always refers to the same underlying state.

pub mod atom;
pub mod clone;
pub mod focus;
pub mod naming;
pub mod reactive;
pub mod store;
pub mod value;

pub use atom::{Atom, AtomId, FocusAtom, PrimitiveAtom, SlotKey, WritableAtom};
pub use clone::{DeepClone, clone_deep};
pub use focus::{Focus, Segment, SliceState, at, pick, prop};
pub use naming::capitalize_first_letter;
pub use reactive::{Observable, Subscription};
pub use store::{HydrateOptions, Store, StoreId, StoreStats, default_store};
pub use value::Value;
