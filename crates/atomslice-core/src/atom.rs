#![forbid(unsafe_code)]

//! Atoms: typed keys into a [`Store`].
//!
//! An atom holds no state of its own. A [`PrimitiveAtom`] describes a root
//! cell (identity plus initial value); each store realizes its own copy of
//! that cell on first use. A [`FocusAtom`] describes a read/write view of a
//! primitive atom through a [`Focus`].
//!
//! Identity matters: stores, hook slots, and subscriptions key on
//! [`AtomId`]. Creating a fresh `FocusAtom` for the same key on every access
//! is correct but defeats subscription reuse. Structural identity (which part
//! of which root) is reported separately as a [`SlotKey`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::clone::DeepClone;
use crate::focus::{Focus, Segment};
use crate::reactive::Subscription;
use crate::store::Store;

// ─── Atom ID generation ──────────────────────────────────────────────────────

static NEXT_ATOM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique atom identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomId(u64);

impl AtomId {
    fn next() -> Self {
        Self(NEXT_ATOM_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "atom#{}", self.0)
    }
}

// ─── Slot keys ───────────────────────────────────────────────────────────────

/// Structural address of the state an atom reads and writes: a root cell and
/// a segment within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub root: AtomId,
    pub segment: Segment,
}

impl SlotKey {
    #[must_use]
    pub fn whole(root: AtomId) -> Self {
        Self {
            root,
            segment: Segment::Whole,
        }
    }

    /// Whether a write to `self` may change what `other` reads.
    #[must_use]
    pub fn overlaps(&self, other: &SlotKey) -> bool {
        self.root == other.root && self.segment.overlaps(&other.segment)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.segment)
    }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A readable, observable atom.
pub trait Atom {
    type Value: Clone + PartialEq + 'static;

    fn id(&self) -> AtomId;

    fn slot(&self) -> SlotKey;

    /// Current value of this atom in `store`.
    fn read(&self, store: &Store) -> Self::Value;

    /// Register `callback` for changes of this atom's value in `store`.
    ///
    /// The callback fires only when the value this atom reads actually
    /// changes, not on every write to the underlying root.
    fn watch(&self, store: &Store, callback: Box<dyn Fn(&Self::Value)>) -> Subscription;
}

/// An atom that accepts writes.
///
/// Call [`Store::set`] rather than [`write`](WritableAtom::write) directly:
/// the store keeps the write ledger that hydration consults.
pub trait WritableAtom: Atom {
    type Input: 'static;

    fn write(&self, store: &Store, value: Self::Input);
}

// ─── Primitive atoms ─────────────────────────────────────────────────────────

struct PrimitiveInner<T> {
    id: AtomId,
    init: T,
    label: Option<String>,
}

/// A root cell description: identity plus initial value.
///
/// Cloning shares the identity.
pub struct PrimitiveAtom<T> {
    inner: Rc<PrimitiveInner<T>>,
}

impl<T> Clone for PrimitiveAtom<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PrimitiveAtom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveAtom")
            .field("id", &self.inner.id)
            .field("label", &self.inner.label)
            .field("init", &self.inner.init)
            .finish()
    }
}

impl<T: Clone + PartialEq + DeepClone + 'static> PrimitiveAtom<T> {
    /// Create a root atom. Each store seeds its cell with a deep copy of
    /// `init`.
    #[must_use]
    pub fn new(init: T) -> Self {
        Self::build(init, None)
    }

    /// Create a root atom with a debug label.
    #[must_use]
    pub fn labeled(init: T, label: impl Into<String>) -> Self {
        Self::build(init, Some(label.into()))
    }

    fn build(init: T, label: Option<String>) -> Self {
        Self {
            inner: Rc::new(PrimitiveInner {
                id: AtomId::next(),
                init,
                label,
            }),
        }
    }

    #[must_use]
    pub fn init(&self) -> &T {
        &self.inner.init
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.inner.label.as_deref()
    }
}

impl<T: Clone + PartialEq + DeepClone + 'static> Atom for PrimitiveAtom<T> {
    type Value = T;

    fn id(&self) -> AtomId {
        self.inner.id
    }

    fn slot(&self) -> SlotKey {
        SlotKey::whole(self.inner.id)
    }

    fn read(&self, store: &Store) -> T {
        store.cell(self).get()
    }

    fn watch(&self, store: &Store, callback: Box<dyn Fn(&T)>) -> Subscription {
        store.cell(self).subscribe(move |v| callback(v))
    }
}

impl<T: Clone + PartialEq + DeepClone + 'static> WritableAtom for PrimitiveAtom<T> {
    type Input = T;

    fn write(&self, store: &Store, value: T) {
        store.cell(self).set(value);
    }
}

// ─── Focus atoms ─────────────────────────────────────────────────────────────

struct FocusInner<S, R, W> {
    id: AtomId,
    root: PrimitiveAtom<S>,
    focus: Focus<S, R, W>,
}

/// A read/write view of a root atom through a [`Focus`].
///
/// The view owns no state: reads project the root cell, writes mutate it.
pub struct FocusAtom<S, R, W = R> {
    inner: Rc<FocusInner<S, R, W>>,
}

impl<S, R, W> Clone for FocusAtom<S, R, W> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S, R, W> fmt::Debug for FocusAtom<S, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusAtom")
            .field("id", &self.inner.id)
            .field("root", &self.inner.root.inner.id)
            .field("segment", self.inner.focus.segment())
            .finish()
    }
}

impl<S, R, W> FocusAtom<S, R, W> {
    /// Derive a view of `root`. Every call yields a fresh identity.
    #[must_use]
    pub fn new(root: &PrimitiveAtom<S>, focus: Focus<S, R, W>) -> Self {
        Self {
            inner: Rc::new(FocusInner {
                id: AtomId::next(),
                root: root.clone(),
                focus,
            }),
        }
    }

    #[must_use]
    pub fn root(&self) -> &PrimitiveAtom<S> {
        &self.inner.root
    }

    #[must_use]
    pub fn focus(&self) -> &Focus<S, R, W> {
        &self.inner.focus
    }
}

impl<S, R, W> Atom for FocusAtom<S, R, W>
where
    S: Clone + PartialEq + DeepClone + 'static,
    R: Clone + PartialEq + 'static,
    W: 'static,
{
    type Value = R;

    fn id(&self) -> AtomId {
        self.inner.id
    }

    fn slot(&self) -> SlotKey {
        SlotKey {
            root: self.inner.root.inner.id,
            segment: self.inner.focus.segment().clone(),
        }
    }

    fn read(&self, store: &Store) -> R {
        store.cell(&self.inner.root).with(|s| self.inner.focus.get(s))
    }

    fn watch(&self, store: &Store, callback: Box<dyn Fn(&R)>) -> Subscription {
        let cell = store.cell(&self.inner.root);
        let focus = self.inner.focus.clone();
        let last = RefCell::new(cell.with(|s| focus.get(s)));
        cell.subscribe(move |source| {
            let next = focus.get(source);
            let changed = {
                let mut last = last.borrow_mut();
                if *last == next {
                    false
                } else {
                    *last = next.clone();
                    true
                }
            };
            if changed {
                callback(&next);
            }
        })
    }
}

impl<S, R, W> WritableAtom for FocusAtom<S, R, W>
where
    S: Clone + PartialEq + DeepClone + 'static,
    R: Clone + PartialEq + 'static,
    W: 'static,
{
    type Input = W;

    fn write(&self, store: &Store, value: W) {
        let focus = &self.inner.focus;
        store.cell(&self.inner.root).update(|s| focus.set(s, value));
    }
}
