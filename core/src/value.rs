//! Dynamic value model for untrusted input.
//!
//! Every schema consumes and produces [`Value`]. The variants cover the
//! native representations the built-in type checks distinguish between,
//! including an explicit [`Value::Undefined`] for absent object keys and an
//! insertion-ordered [`ValueSet`] for set-shaped collections.
//!
//! # Examples
//!
//! ```
//! use shapeguard_core::{Map, Value, ValueSet};
//!
//! let mut map = Map::new();
//! map.insert("name".into(), Value::from("ferris"));
//! map.insert("legs".into(), Value::from(6));
//! let value = Value::Object(map);
//! assert_eq!(value.type_name(), "object");
//!
//! let set: ValueSet = [Value::from(1), Value::from(1), Value::from(2)]
//!     .into_iter()
//!     .collect();
//! assert_eq!(set.len(), 2);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Insertion-ordered string-keyed map used for object values.
pub type Map = IndexMap<String, Value>;

/// A dynamically typed value.
///
/// Equality is structural. Numbers compare with IEEE semantics, so a
/// `Number(NaN)` is never equal to itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value (a missing object key, or an explicit "undefined").
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    Bool(bool),
    Number(f64),
    BigInt(i128),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    Set(ValueSet),
    Object(Map),
}

impl Value {
    /// Returns a short lowercase name for the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::BigInt(_) => "bigint",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Set(_) => "set",
            Value::Object(_) => "object",
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(set) => Some(set),
            _ => None,
        }
    }

    /// Looks up `key` on an object value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Converts into a [`serde_json::Value`] using the same rules as the
    /// [`Serialize`] impl.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            Value::BigInt(n) => serde_json::Value::String(n.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Set(set) => serde_json::Value::Array(set.iter().map(Value::to_json).collect()),
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

/// Whole numbers inside the exactly representable range, as integers.
fn integral(n: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    (n.fract() == 0.0 && n.abs() <= MAX_SAFE).then_some(n as i64)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Undefined => serializer.serialize_none(),
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::BigInt(n) => serializer.serialize_str(&n.to_string()),
            Value::String(s) => serializer.serialize_str(s),
            Value::Date(d) => serializer.serialize_str(&d.to_rfc3339()),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Set(set) => {
                let mut seq = serializer.serialize_seq(Some(set.len()))?;
                for item in set.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(map) => {
                let mut out = serializer.serialize_map(None)?;
                for (key, value) in map.iter().filter(|(_, v)| !v.is_undefined()) {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Date(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Map> for Value {
    fn from(value: Map) -> Self {
        Value::Object(value)
    }
}

impl From<ValueSet> for Value {
    fn from(value: ValueSet) -> Self {
        Value::Set(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

/// Structural hash consistent with `Value`'s `PartialEq`: `0.0` and
/// `-0.0` collide, and object entries and set members hash independently
/// of their order. NaN hashes like any number but never compares equal.
fn fingerprint(value: &Value) -> u64 {
    let mut state = DefaultHasher::new();
    hash_value(value, &mut state);
    state.finish()
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    std::mem::discriminant(value).hash(state);
    match value {
        Value::Undefined | Value::Null => {}
        Value::Bool(b) => b.hash(state),
        Value::Number(n) => {
            let n = if *n == 0.0 { 0.0 } else { *n };
            n.to_bits().hash(state);
        }
        Value::BigInt(n) => n.hash(state),
        Value::String(s) => s.hash(state),
        Value::Date(d) => d.hash(state),
        Value::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Value::Set(set) => {
            set.len().hash(state);
            set.iter()
                .fold(0u64, |acc, item| acc.wrapping_add(fingerprint(item)))
                .hash(state);
        }
        Value::Object(map) => {
            map.len().hash(state);
            map.iter()
                .map(|(key, item)| {
                    let mut entry = DefaultHasher::new();
                    key.hash(&mut entry);
                    hash_value(item, &mut entry);
                    entry.finish()
                })
                .fold(0u64, u64::wrapping_add)
                .hash(state);
        }
    }
}

/// Collection with set semantics: each element appears once and iteration
/// follows insertion order.
///
/// Membership is resolved through a hash index, so building a set of `n`
/// values is linear. A NaN member is never equal to anything, so every NaN
/// inserted is kept.
///
/// Elements carry no native index; schemas that report paths into a set
/// assign a synthetic position while iterating.
#[derive(Clone, Default)]
pub struct ValueSet {
    items: Vec<Value>,
    /// fingerprint -> positions in `items`
    buckets: HashMap<u64, Vec<usize>>,
}

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `value` unless a structurally equal element is already present.
    ///
    /// Returns `true` if the value was inserted.
    pub fn insert(&mut self, value: Value) -> bool {
        let key = fingerprint(&value);
        if self.find(key, &value) {
            return false;
        }
        self.buckets.entry(key).or_default().push(self.items.len());
        self.items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.find(fingerprint(value), value)
    }

    fn find(&self, key: u64, value: &Value) -> bool {
        self.buckets
            .get(&key)
            .is_some_and(|slots| slots.iter().any(|&slot| self.items[slot] == *value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.items).finish()
    }
}

impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|item| other.contains(item))
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = ValueSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl IntoIterator for ValueSet {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueSet {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_json_preserves_key_order() {
        let value = Value::from(json!({"b": 1, "a": [true, null]}));
        let map = value.as_object().unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            map.get("a"),
            Some(&Value::Array(vec![Value::Bool(true), Value::Null]))
        );
    }

    #[test]
    fn test_set_rejects_duplicates() {
        let mut set = ValueSet::new();
        assert!(set.insert(Value::from("a")));
        assert!(!set.insert(Value::from("a")));
        assert!(set.insert(Value::from("b")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a: ValueSet = [Value::from(1), Value::from(2)].into_iter().collect();
        let b: ValueSet = [Value::from(2), Value::from(1)].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_set_membership_follows_value_equality() {
        let mut set = ValueSet::new();
        assert!(set.insert(Value::Number(0.0)));
        assert!(!set.insert(Value::Number(-0.0)));
        assert!(set.insert(Value::Number(f64::NAN)));
        assert!(set.insert(Value::Number(f64::NAN)));
        assert_eq!(set.len(), 3);

        let pair = Value::from(json!([1, 2]));
        let mut ab = Map::new();
        ab.insert("a".into(), Value::from(1));
        ab.insert("b".into(), pair.clone());
        let mut ba = Map::new();
        ba.insert("b".into(), pair);
        ba.insert("a".into(), Value::from(1));
        assert!(set.insert(Value::Object(ab)));
        assert!(set.contains(&Value::Object(ba)));
        assert!(!set.contains(&Value::from(json!({"a": 1, "b": [2, 1]}))));

        let inner: ValueSet = [Value::from(1), Value::from(2)].into_iter().collect();
        let flipped: ValueSet = [Value::from(2), Value::from(1)].into_iter().collect();
        assert!(set.insert(Value::Set(inner)));
        assert!(!set.insert(Value::Set(flipped)));
    }

    #[test]
    fn test_set_build_scales_linearly() {
        let started = Instant::now();
        let set: ValueSet = (0..100_000).map(Value::from).collect();
        assert_eq!(set.len(), 100_000);
        let copy: ValueSet = set.iter().rev().cloned().collect();
        assert_eq!(set, copy);
        assert!(started.elapsed() < Duration::from_secs(5), "took {:?}", started.elapsed());
    }

    #[test]
    fn test_nan_is_not_equal_to_itself() {
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_serialize_skips_undefined_entries() {
        let mut map = Map::new();
        map.insert("kept".into(), Value::from(1));
        map.insert("dropped".into(), Value::Undefined);
        map.insert("big".into(), Value::BigInt(12));
        map.insert("half".into(), Value::from(0.5));
        let json = serde_json::to_value(Value::Object(map)).unwrap();
        assert_eq!(json, json!({"kept": 1, "big": "12", "half": 0.5}));
    }

    #[test]
    fn test_to_json_matches_serialize() {
        let set: ValueSet = [Value::from("x"), Value::from("y")].into_iter().collect();
        let value = Value::Array(vec![Value::Set(set), Value::Undefined]);
        assert_eq!(value.to_json(), serde_json::to_value(&value).unwrap());
    }
}
