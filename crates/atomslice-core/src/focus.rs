#![forbid(unsafe_code)]

//! Focus resolver: typed accessor/mutator pairs that narrow a root value.
//!
//! A [`Focus<S, R, W>`] reads an `R` out of a source `S` and writes a `W` back
//! into it. Three constructors cover the projections the stores need:
//!
//! | Constructor | Source            | Reads             | Writes            |
//! |-------------|-------------------|-------------------|-------------------|
//! | [`pick`]    | `SliceState<V>`   | `SliceState<V>`   | `SliceState<V>`   |
//! | [`prop`]    | `SliceState<V>`   | `Option<V>`       | `V`               |
//! | [`at`]      | `Vec<T>`          | `Option<T>`       | `T`               |
//!
//! Every focus also carries a [`Segment`] describing *which part* of the
//! source it touches. Two foci with equal segments over the same root are
//! interchangeable; the store ledgers key on segments, not on closures.
//!
//! # Invariants
//!
//! 1. A write never touches source slots outside the focus segment.
//! 2. `at` never changes the sequence length; out-of-range writes are no-ops.
//! 3. Absent keys and out-of-range indices read as `None`.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

/// Keyed-map state held by a slice store. Iteration follows insertion order.
pub type SliceState<V> = IndexMap<String, V>;

/// The structural part of a root value a focus reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    /// The entire root value.
    Whole,
    /// One map key.
    Key(String),
    /// A set of map keys.
    Keys(BTreeSet<String>),
    /// One sequence index.
    Index(usize),
}

impl Segment {
    /// Whether a write to `self` may change what `other` reads.
    #[must_use]
    pub fn overlaps(&self, other: &Segment) -> bool {
        match (self, other) {
            (Self::Whole, _) | (_, Self::Whole) => true,
            (Self::Key(a), Self::Key(b)) => a == b,
            (Self::Key(k), Self::Keys(set)) | (Self::Keys(set), Self::Key(k)) => set.contains(k),
            (Self::Keys(a), Self::Keys(b)) => !a.is_disjoint(b),
            (Self::Index(a), Self::Index(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole => f.write_str("*"),
            Self::Key(k) => write!(f, ".{k}"),
            Self::Keys(keys) => {
                f.write_str("{")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(k)?;
                }
                f.write_str("}")
            }
            Self::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// A read/write projection from `S` to a part of it.
///
/// Cloning is cheap: the accessor and mutator are reference counted.
pub struct Focus<S, R, W = R> {
    segment: Segment,
    get: Rc<dyn Fn(&S) -> R>,
    set: Rc<dyn Fn(&mut S, W)>,
}

impl<S, R, W> Clone for Focus<S, R, W> {
    fn clone(&self) -> Self {
        Self {
            segment: self.segment.clone(),
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<S, R, W> fmt::Debug for Focus<S, R, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Focus")
            .field("segment", &self.segment)
            .finish_non_exhaustive()
    }
}

impl<S, R, W> Focus<S, R, W> {
    /// Build a focus from an explicit accessor/mutator pair.
    ///
    /// The caller promises that `set` only touches the part of `S` that
    /// `segment` names.
    pub fn new(
        segment: Segment,
        get: impl Fn(&S) -> R + 'static,
        set: impl Fn(&mut S, W) + 'static,
    ) -> Self {
        Self {
            segment,
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    #[must_use]
    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    /// Project the focused part out of `source`.
    pub fn get(&self, source: &S) -> R {
        (self.get)(source)
    }

    /// Write `value` into the focused part of `source`.
    pub fn set(&self, source: &mut S, value: W) {
        (self.set)(source, value);
    }
}

/// Focus on a subset of keys.
///
/// Reading yields the picked keys that are present, in source order. Writing
/// replaces every picked key present in the written map, removes every picked
/// key absent from it, and ignores keys outside the pick set.
pub fn pick<V, K>(keys: &[K]) -> Focus<SliceState<V>, SliceState<V>>
where
    V: Clone + 'static,
    K: AsRef<str>,
{
    let set: BTreeSet<String> = keys.iter().map(|k| k.as_ref().to_owned()).collect();
    let read_keys = set.clone();
    let write_keys = set.clone();
    Focus::new(
        Segment::Keys(set),
        move |source: &SliceState<V>| {
            source
                .iter()
                .filter(|(k, _)| read_keys.contains(k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        },
        move |source: &mut SliceState<V>, mut value: SliceState<V>| {
            for key in &write_keys {
                match value.shift_remove(key.as_str()) {
                    Some(v) => {
                        source.insert(key.clone(), v);
                    }
                    None => {
                        source.shift_remove(key.as_str());
                    }
                }
            }
        },
    )
}

/// Focus on a single key. Reads `None` when the key is absent; writes insert
/// or replace.
pub fn prop<V>(key: &str) -> Focus<SliceState<V>, Option<V>, V>
where
    V: Clone + 'static,
{
    let read_key = key.to_owned();
    let write_key = key.to_owned();
    Focus::new(
        Segment::Key(key.to_owned()),
        move |source: &SliceState<V>| source.get(read_key.as_str()).cloned(),
        move |source: &mut SliceState<V>, value: V| {
            source.insert(write_key.clone(), value);
        },
    )
}

/// Focus on a single index. Reads `None` when out of range; out-of-range
/// writes leave the sequence untouched.
pub fn at<T>(index: usize) -> Focus<Vec<T>, Option<T>, T>
where
    T: Clone + 'static,
{
    Focus::new(
        Segment::Index(index),
        move |source: &Vec<T>| source.get(index).cloned(),
        move |source: &mut Vec<T>, value: T| {
            if let Some(slot) = source.get_mut(index) {
                *slot = value;
            }
        },
    )
}
