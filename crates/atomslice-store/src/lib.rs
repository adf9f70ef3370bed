#![forbid(unsafe_code)]

//! Store generators.
//!
//! - [`SliceStore`]: keyed-map state. One root cell, with per-key and
//!   per-key-set views, accessors, and hooks.
//! - [`VecStore`]: ordered, index-addressed state with per-index views.
//!
//! Both memoize their views in a map keyed by key, key set, or index, so
//! every accessor and hook for the same part of the state shares one atom
//! identity.

pub mod names;
pub mod options;
pub mod slice;
pub mod vector;

pub use names::{SliceNames, VecNames};
pub use options::StoreOptions;
pub use slice::{KeyAtom, KeysAtom, SliceStore, create_slice_store};
pub use vector::{ItemAtom, VecStore, create_vec_store};
