//! Tree model for JSON-like property structures
//!
//! [`Node`] is an explicit sum type over the shapes a property tree can take.
//! `Absent` is a variant of its own, so "missing" never has to be encoded
//! as a sentinel null.
//!
//! Conversions to and from [`serde_json::Value`] are lossless for every
//! tree that does not contain `Absent`. When rendering back to JSON, absent
//! mapping entries are dropped and absent sequence elements become `null`,
//! the same way a missing value serializes in JSON.

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;

/// A value in a property tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Missing value
    #[default]
    Absent,
    /// Leaf value
    Scalar(Scalar),
    /// Ordered sequence of nodes
    Sequence(Vec<Node>),
    /// String-keyed mapping, insertion ordered
    Mapping(Mapping),
}

/// Non-structural leaf values
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// Insertion-ordered mapping with unique string keys
///
/// Re-inserting an existing key replaces the value but keeps the key at its
/// original position, so the last writer wins.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
    index: HashMap<String, usize>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a value, returning the previous value stored under `key`
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => Some(std::mem::replace(&mut self.entries[position].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Key order does not take part in equality, only the key set and values do
impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| v == value))
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut mapping = Mapping::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            mapping.insert(key, value);
        }
        mapping
    }
}

impl IntoIterator for Mapping {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    /// Sequences and mappings are structural, everything else is a leaf
    pub fn is_structural(&self) -> bool {
        matches!(self, Node::Sequence(_) | Node::Mapping(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a key when this node is a mapping
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Nesting depth: leaves are 0, each sequence or mapping level adds one.
    ///
    /// Computed with an explicit stack so it is safe on arbitrarily deep trees.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, level)) = stack.pop() {
            match node {
                Node::Absent | Node::Scalar(_) => deepest = deepest.max(level),
                Node::Sequence(items) => {
                    deepest = deepest.max(level + 1);
                    stack.extend(items.iter().map(|item| (item, level + 1)));
                }
                Node::Mapping(map) => {
                    deepest = deepest.max(level + 1);
                    stack.extend(map.values().map(|value| (value, level + 1)));
                }
            }
        }
        deepest
    }

    /// Render as JSON. `Absent` at the root yields `None`.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Node::Absent => None,
            Node::Scalar(scalar) => Some(scalar.to_value()),
            Node::Sequence(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| item.to_value().unwrap_or(Value::Null))
                    .collect(),
            )),
            Node::Mapping(map) => {
                let mut object = Map::new();
                for (key, value) in map.iter() {
                    if let Some(value) = value.to_value() {
                        object.insert(key.to_string(), value);
                    }
                }
                Some(Value::Object(object))
            }
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Node::Absent => None,
            Node::Scalar(scalar) => Some(scalar.into_value()),
            Node::Sequence(items) => Some(Value::Array(
                items
                    .into_iter()
                    .map(|item| item.into_value().unwrap_or(Value::Null))
                    .collect(),
            )),
            Node::Mapping(map) => Some(Value::Object(
                map.into_iter()
                    .filter_map(|(key, value)| value.into_value().map(|v| (key, v)))
                    .collect(),
            )),
        }
    }
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    pub fn into_value(self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Number(n) => Value::Number(n),
            Scalar::String(s) => Value::String(s),
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n)),
            Value::String(s) => Node::Scalar(Scalar::String(s)),
            Value::Array(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Object(object) => Node::Mapping(
                object
                    .into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Node::from(value.clone())
    }
}

impl From<Option<Value>> for Node {
    fn from(value: Option<Value>) -> Self {
        value.map(Node::from).unwrap_or(Node::Absent)
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

impl From<u64> for Node {
    fn from(n: u64) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

/// Non-finite floats have no JSON representation and become `null`
impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Number::from_f64(n)
            .map(|n| Node::Scalar(Scalar::Number(n)))
            .unwrap_or_else(Node::null)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Absent => serializer.serialize_none(),
            Node::Scalar(scalar) => scalar.serialize(serializer),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Mapping(map) => {
                let present = map.values().filter(|v| !v.is_absent()).count();
                let mut out = serializer.serialize_map(Some(present))?;
                for (key, value) in map.iter().filter(|(_, v)| !v.is_absent()) {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(n) => n.serialize(serializer),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_roundtrip_keeps_order() {
        let value = json!({"zeta": 1, "alpha": [true, null, "x"], "mid": {"k": 2.5}});
        let node = Node::from(value.clone());
        let keys: Vec<&str> = node.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(node.into_value(), Some(value));
    }

    #[test]
    fn test_absent_rendering() {
        assert_eq!(Node::Absent.to_value(), None);

        let mut map = Mapping::new();
        map.insert("gone", Node::Absent);
        map.insert("kept", Node::from(1i64));
        let node = Node::Sequence(vec![Node::Mapping(map), Node::Absent]);
        assert_eq!(node.to_value(), Some(json!([{"kept": 1}, null])));
        assert_eq!(serde_json::to_value(&node).unwrap(), json!([{"kept": 1}, null]));
    }

    #[test]
    fn test_mapping_last_writer_wins_in_place() {
        let mut map = Mapping::new();
        assert!(map.insert("a", Node::from(1i64)).is_none());
        map.insert("b", Node::from(2i64));
        let previous = map.insert("a", Node::from(3i64));
        assert_eq!(previous, Some(Node::from(1i64)));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&Node::from(3i64)));
    }

    #[test]
    fn test_mapping_equality_ignores_order() {
        let left: Mapping = vec![("a", Node::from(1i64)), ("b", Node::null())]
            .into_iter()
            .collect();
        let right: Mapping = vec![("b", Node::null()), ("a", Node::from(1i64))]
            .into_iter()
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_depth() {
        assert_eq!(Node::Absent.depth(), 0);
        assert_eq!(Node::from("leaf").depth(), 0);
        assert_eq!(Node::from(json!({})).depth(), 1);
        assert_eq!(Node::from(json!({"a": {"b": [1]}})).depth(), 3);
    }

    #[test]
    fn test_deserialize_from_json_text() {
        let node: Node = serde_json::from_str(r#"{"path": "/tmp/x", "n": 10000000000}"#).unwrap();
        assert_eq!(node.get("path").and_then(Node::as_str), Some("/tmp/x"));
        assert_eq!(node.get("n"), Some(&Node::from(10_000_000_000u64)));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        assert_eq!(Node::from(f64::NAN), Node::null());
    }
}
