#![forbid(unsafe_code)]

//! Dynamic values for heterogeneous slices.
//!
//! A slice store is generic over its value type. When different keys hold
//! different kinds of data, [`Value`] is the usual choice:
//!
//! ```
//! use atomslice_core::{SliceState, Value};
//!
//! let mut state: SliceState<Value> = SliceState::new();
//! state.insert("count".into(), Value::from(0));
//! state.insert("title".into(), Value::from("untitled"));
//! state.insert("tags".into(), Value::List(vec![Value::from("a")]));
//! assert_eq!(state["count"].as_i64(), Some(0));
//! ```
//!
//! With the `serde` feature, `Value` converts to and from JSON so a
//! server-rendered snapshot can seed a store through hydration. Dates
//! serialize as RFC 3339 strings and come back as [`Value::Str`].

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use crate::clone::DeepClone;

/// A dynamically-typed state value.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(DateTime<Utc>),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view: integers widen to `f64`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up `key` if this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Look up `index` if this is a list.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.as_list().and_then(|l| l.get(index))
    }

    /// Short kind name, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::Date(_) => "date",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl DeepClone for Value {
    fn deep_clone(&self) -> Self {
        match self {
            Self::Null => Self::Null,
            Self::Bool(b) => Self::Bool(*b),
            Self::Int(i) => Self::Int(*i),
            Self::Float(f) => Self::Float(*f),
            Self::Str(s) => Self::Str(s.clone()),
            Self::Date(d) => Self::Date(*d),
            Self::List(items) => Self::List(items.deep_clone()),
            Self::Map(map) => Self::Map(map.deep_clone()),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Self::Date(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::Map(iter.into_iter().collect())
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                Self::Map(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

#[cfg(feature = "serde")]
impl Value {
    /// Parse a JSON document into a `Value`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(json).map(Self::from)
    }

    /// Parse a JSON object into slice state, e.g. a server-rendered
    /// snapshot destined for hydration. Non-object documents yield an empty
    /// state.
    pub fn state_from_json_str(json: &str) -> Result<crate::focus::SliceState<Self>, serde_json::Error> {
        Ok(match Self::from_json_str(json)? {
            Self::Map(map) => map,
            _ => crate::focus::SliceState::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Value {
        let when = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .single()
            .unwrap_or_default();
        [
            ("name".to_string(), Value::from("demo")),
            ("created".to_string(), Value::Date(when)),
            (
                "nested".to_string(),
                [("xs".to_string(), Value::from(vec![1, 2, 3]))]
                    .into_iter()
                    .collect(),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn deep_clone_isolates_nested_containers() {
        let original = sample();
        let mut copy = original.deep_clone();

        if let Some(xs) = copy
            .as_map_mut()
            .and_then(|m| m.get_mut("nested"))
            .and_then(Value::as_map_mut)
            .and_then(|m| m.get_mut("xs"))
            .and_then(Value::as_list_mut)
        {
            xs.push(Value::from(4));
        }

        assert_eq!(
            original.get("nested").and_then(|n| n.get("xs")).and_then(Value::as_list).map(<[Value]>::len),
            Some(3)
        );
        assert_eq!(
            copy.get("nested").and_then(|n| n.get("xs")).and_then(Value::as_list).map(<[Value]>::len),
            Some(4)
        );
    }

    #[test]
    fn deep_clone_preserves_kinds() {
        let original = sample();
        let copy = original.deep_clone();
        assert_eq!(copy, original);
        assert_eq!(copy.get("created").map(Value::kind), Some("date"));
        assert_eq!(copy.get("nested").map(Value::kind), Some("map"));
        assert_eq!(
            copy.get("nested").and_then(|n| n.get("xs")).map(Value::kind),
            Some("list")
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(3).as_i64(), Some(3));
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::from(None::<i32>).is_null());
        assert_eq!(Value::from(vec![1, 2]).at(1), Some(&Value::Int(2)));
        assert_eq!(Value::from(1).get("k"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_snapshot_to_state() {
        let state = Value::state_from_json_str(r#"{"count": 100, "ratio": 0.5, "tags": ["a"]}"#)
            .unwrap_or_default();
        assert_eq!(state["count"], Value::Int(100));
        assert_eq!(state["ratio"], Value::Float(0.5));
        assert_eq!(state["tags"], Value::List(vec![Value::from("a")]));
    }
}
