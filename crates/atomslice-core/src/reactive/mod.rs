#![forbid(unsafe_code)]

//! Change-tracking primitive underneath every store cell.
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! Store cells are `Observable`s behind `Rc<RefCell<..>>`; nothing here is
//! `Send`. A subscriber holds a strong handle to its own callback and the
//! cell keeps only a weak one, so dropping the guard is enough to detach.
//! Dead entries are swept at the start of the next change.
//!
//! Guarantees the store layer builds on:
//!
//! - An equal write changes nothing: the version stays put and nobody hears
//!   about it.
//! - Every effective change bumps the version by one.
//! - Callbacks fire in the order they were registered, outside the interior
//!   borrow, and may write back to the cell. A write from inside a callback
//!   supersedes the cycle that triggered it.

pub mod observable;

pub use observable::{Observable, Subscription};
