#![forbid(unsafe_code)]

//! Runtime: the consumption side of atomslice.
//!
//! A [`Component`] is one mounted consumer. Each call to
//! [`Component::render`] hands the body a [`Hooks`] cursor over the
//! component's ordered hook slots, which persist between renders:
//!
//! - [`Hooks::use_atom_value`] subscribes the component to an atom and marks
//!   it dirty when (and only when) that atom's value changes.
//! - [`Hooks::use_set_atom`] returns a [`Setter`] without subscribing.
//! - [`Hooks::use_memo`] / [`Hooks::use_memo_with`] keep a derived value's
//!   identity stable across renders.
//! - [`Hooks::use_hydrate`] seeds atoms once per component lifetime.
//!
//! A [`Provider`] scopes which [`Store`](atomslice_core::Store) hooks resolve
//! against while its children run.

pub mod component;
pub mod hooks;
pub mod provider;
pub mod setter;

pub use component::{Component, ComponentId};
pub use hooks::{Hooks, Hydration};
pub use provider::{Provider, create_provider, current_store};
pub use setter::Setter;
