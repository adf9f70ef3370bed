#![forbid(unsafe_code)]

//! Structural deep copies.
//!
//! `Clone` on `Rc<RefCell<T>>` (and `Arc<Mutex<T>>`) shares the interior, so
//! a cloned state tree can still alias the caller's data. [`DeepClone`]
//! allocates fresh storage at every level instead. Stores deep-copy their
//! initial value when a cell is seeded and on every full reset.
//!
//! # Invariants
//!
//! 1. `x.deep_clone() == x` for every type that is also `PartialEq`.
//! 2. Mutating the copy through any interior-mutable handle never changes
//!    the original.
//! 3. Container kinds are preserved (a map stays a map, a date stays a date).

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use indexmap::{IndexMap, IndexSet};

/// A copy that shares no interior storage with the original.
pub trait DeepClone: Sized {
    /// Produce an independent copy.
    #[must_use]
    fn deep_clone(&self) -> Self;
}

/// Free-function form of [`DeepClone::deep_clone`].
#[must_use]
pub fn clone_deep<T: DeepClone>(value: &T) -> T {
    value.deep_clone()
}

macro_rules! deep_clone_via_clone {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DeepClone for $ty {
                #[inline]
                fn deep_clone(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

deep_clone_via_clone!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::Duration,
);

impl<Tz: chrono::TimeZone> DeepClone for chrono::DateTime<Tz> {
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

impl<T: DeepClone> DeepClone for Option<T> {
    fn deep_clone(&self) -> Self {
        self.as_ref().map(DeepClone::deep_clone)
    }
}

impl<T: DeepClone, E: DeepClone> DeepClone for Result<T, E> {
    fn deep_clone(&self) -> Self {
        match self {
            Ok(v) => Ok(v.deep_clone()),
            Err(e) => Err(e.deep_clone()),
        }
    }
}

impl<T: DeepClone> DeepClone for Box<T> {
    fn deep_clone(&self) -> Self {
        Box::new((**self).deep_clone())
    }
}

impl<T: DeepClone> DeepClone for Rc<T> {
    fn deep_clone(&self) -> Self {
        Rc::new((**self).deep_clone())
    }
}

impl<T: DeepClone> DeepClone for Arc<T> {
    fn deep_clone(&self) -> Self {
        Arc::new((**self).deep_clone())
    }
}

impl<T: DeepClone> DeepClone for RefCell<T> {
    fn deep_clone(&self) -> Self {
        RefCell::new(self.borrow().deep_clone())
    }
}

impl<T: Copy> DeepClone for Cell<T> {
    fn deep_clone(&self) -> Self {
        Cell::new(self.get())
    }
}

impl<T: DeepClone> DeepClone for Mutex<T> {
    fn deep_clone(&self) -> Self {
        let guard = self
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Mutex::new(guard.deep_clone())
    }
}

impl<T: DeepClone> DeepClone for Vec<T> {
    fn deep_clone(&self) -> Self {
        self.iter().map(DeepClone::deep_clone).collect()
    }
}

impl<T: DeepClone> DeepClone for VecDeque<T> {
    fn deep_clone(&self) -> Self {
        self.iter().map(DeepClone::deep_clone).collect()
    }
}

impl<K: DeepClone + Ord, V: DeepClone> DeepClone for BTreeMap<K, V> {
    fn deep_clone(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.deep_clone(), v.deep_clone()))
            .collect()
    }
}

impl<T: DeepClone + Ord> DeepClone for BTreeSet<T> {
    fn deep_clone(&self) -> Self {
        self.iter().map(DeepClone::deep_clone).collect()
    }
}

impl<K, V, S> DeepClone for HashMap<K, V, S>
where
    K: DeepClone + Eq + Hash,
    V: DeepClone,
    S: BuildHasher + Clone,
{
    fn deep_clone(&self) -> Self {
        let mut out = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (k, v) in self {
            out.insert(k.deep_clone(), v.deep_clone());
        }
        out
    }
}

impl<T, S> DeepClone for HashSet<T, S>
where
    T: DeepClone + Eq + Hash,
    S: BuildHasher + Clone,
{
    fn deep_clone(&self) -> Self {
        let mut out = HashSet::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for item in self {
            out.insert(item.deep_clone());
        }
        out
    }
}

impl<K, V, S> DeepClone for IndexMap<K, V, S>
where
    K: DeepClone + Eq + Hash,
    V: DeepClone,
    S: BuildHasher + Clone,
{
    fn deep_clone(&self) -> Self {
        let mut out = IndexMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (k, v) in self {
            out.insert(k.deep_clone(), v.deep_clone());
        }
        out
    }
}

impl<T, S> DeepClone for IndexSet<T, S>
where
    T: DeepClone + Eq + Hash,
    S: BuildHasher + Clone,
{
    fn deep_clone(&self) -> Self {
        let mut out = IndexSet::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for item in self {
            out.insert(item.deep_clone());
        }
        out
    }
}

impl<A: DeepClone, B: DeepClone> DeepClone for (A, B) {
    fn deep_clone(&self) -> Self {
        (self.0.deep_clone(), self.1.deep_clone())
    }
}

impl<A: DeepClone, B: DeepClone, C: DeepClone> DeepClone for (A, B, C) {
    fn deep_clone(&self) -> Self {
        (self.0.deep_clone(), self.1.deep_clone(), self.2.deep_clone())
    }
}

impl<T: DeepClone, const N: usize> DeepClone for [T; N] {
    fn deep_clone(&self) -> Self {
        std::array::from_fn(|i| self[i].deep_clone())
    }
}
