//! # Document Values
//!
//! [`DocValue`] is the JSON-shaped value tree that store keys, query rows, and
//! rendered responses are made of. Sequence and map nodes are shared
//! (`Rc<RefCell<..>>`), so a value graph can contain the same node twice or
//! even reference itself; the serialization paths are built around that:
//!
//! - [`DocValue::to_pretty`] is the standard indented serialization. Its
//!   `Serialize` impl tracks the current serialization path by node identity
//!   and reports a "circular structure" error instead of recursing forever.
//! - [`DocValue::to_pretty_lossy`] never fails: it records every visited node
//!   in an identity set and substitutes [`CIRCULAR_PLACEHOLDER`] the first
//!   time any node is seen again, so output stays finite on any graph.
//!
//! The distinction matters: sharing a node twice in a tree is legal for the
//! standard path (the path set is unwound on exit), while the lossy writer
//! replaces every revisit, which is what bounds its output.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::rc::Rc;

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::Result;

/// Substituted for a node that was already visited by the lossy writer.
pub const CIRCULAR_PLACEHOLDER: &str = "[Circular Reference]";

#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Rc<RefCell<Vec<DocValue>>>),
    Map(Rc<RefCell<BTreeMap<String, DocValue>>>),
}

impl DocValue {
    pub fn new_list() -> DocValue {
        DocValue::List(Rc::new(RefCell::new(Vec::new())))
    }

    pub fn new_map() -> DocValue {
        DocValue::Map(Rc::new(RefCell::new(BTreeMap::new())))
    }

    /// Appends to a list value. Returns false when `self` is not a list.
    pub fn push(&self, value: impl Into<DocValue>) -> bool {
        match self {
            DocValue::List(items) => {
                items.borrow_mut().push(value.into());
                true
            }
            _ => false,
        }
    }

    /// Inserts into a map value. Returns false when `self` is not a map.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<DocValue>) -> bool {
        match self {
            DocValue::Map(entries) => {
                entries.borrow_mut().insert(key.into(), value.into());
                true
            }
            _ => false,
        }
    }

    /// Looks up a field of a map value.
    pub fn field(&self, name: &str) -> Option<DocValue> {
        match self {
            DocValue::Map(entries) => entries.borrow().get(name).cloned(),
            _ => None,
        }
    }

    /// Parses a CLI literal: null/booleans/numbers first, anything else is text.
    pub fn from_literal(raw: &str) -> DocValue {
        match raw {
            "null" => return DocValue::Null,
            "true" => return DocValue::Bool(true),
            "false" => return DocValue::Bool(false),
            _ => {}
        }
        if let Ok(number) = raw.parse::<i64>() {
            return DocValue::Int(number);
        }
        if let Ok(number) = raw.parse::<f64>() {
            return DocValue::Float(number);
        }
        DocValue::Text(raw.to_string())
    }

    /// Converts any serializable value into a `DocValue` tree.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<DocValue> {
        Ok(serde_json::to_value(value)?.into())
    }

    fn rank(&self) -> u8 {
        match self {
            DocValue::Null => 0,
            DocValue::Bool(_) => 1,
            DocValue::Int(_) | DocValue::Float(_) => 2,
            DocValue::Text(_) => 3,
            DocValue::List(_) => 4,
            DocValue::Map(_) => 5,
        }
    }

    fn as_f64(&self) -> f64 {
        match self {
            DocValue::Int(number) => *number as f64,
            DocValue::Float(number) => *number,
            _ => 0.0,
        }
    }

    /// Key collation: null < bool < number < string < list < map, with
    /// element-wise comparison inside lists and maps.
    pub fn collate(&self, other: &DocValue) -> Ordering {
        if self.rank() != other.rank() {
            return self.rank().cmp(&other.rank());
        }
        match (self, other) {
            (DocValue::Bool(a), DocValue::Bool(b)) => a.cmp(b),
            (DocValue::Text(a), DocValue::Text(b)) => a.cmp(b),
            (DocValue::List(a), DocValue::List(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.collate(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (DocValue::Map(a), DocValue::Map(b)) => {
                let a = a.borrow();
                let b = b.borrow();
                for ((key_a, val_a), (key_b, val_b)) in a.iter().zip(b.iter()) {
                    let ord = key_a.cmp(key_b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                    let ord = val_a.collate(val_b);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) if a.rank() == 2 => {
                a.as_f64().partial_cmp(&b.as_f64()).unwrap_or(Ordering::Equal)
            }
            _ => Ordering::Equal,
        }
    }

    /// Key prefix match: string keys by leading characters, list keys by
    /// leading elements, anything else by equality.
    pub fn starts_with(&self, prefix: &DocValue) -> bool {
        match (self, prefix) {
            (DocValue::Text(key), DocValue::Text(lead)) => key.starts_with(lead.as_str()),
            (DocValue::List(key), DocValue::List(lead)) => {
                let key = key.borrow();
                let lead = lead.borrow();
                lead.len() <= key.len()
                    && lead
                        .iter()
                        .zip(key.iter())
                        .all(|(p, k)| p.collate(k) == Ordering::Equal)
            }
            _ => self.collate(prefix) == Ordering::Equal,
        }
    }

    /// Standard indented serialization; fails on cyclic graphs.
    pub fn to_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Indented serialization that never fails: the first revisit of any
    /// shared node becomes [`CIRCULAR_PLACEHOLDER`].
    pub fn to_pretty_lossy(&self) -> String {
        let mut out = String::new();
        let mut seen = HashSet::new();
        write_guarded(&mut out, self, &mut seen, 0);
        out
    }
}

impl Serialize for DocValue {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let path = RefCell::new(HashSet::new());
        PathGuarded { value: self, path: &path }.serialize(serializer)
    }
}

/// Serializes one node while tracking the node identities on the current
/// serialization path, so a cycle surfaces as an error instead of unbounded
/// recursion. Identities are removed on exit: a node shared by two siblings
/// is not a cycle.
struct PathGuarded<'a> {
    value: &'a DocValue,
    path: &'a RefCell<HashSet<usize>>,
}

impl Serialize for PathGuarded<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            DocValue::Null => serializer.serialize_unit(),
            DocValue::Bool(flag) => serializer.serialize_bool(*flag),
            DocValue::Int(number) => serializer.serialize_i64(*number),
            DocValue::Float(number) => serializer.serialize_f64(*number),
            DocValue::Text(text) => serializer.serialize_str(text),
            DocValue::List(items) => {
                let addr = Rc::as_ptr(items) as usize;
                if !self.path.borrow_mut().insert(addr) {
                    return Err(S::Error::custom("circular structure detected"));
                }
                let items = items.borrow();
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(&PathGuarded { value: item, path: self.path })?;
                }
                let done = seq.end()?;
                self.path.borrow_mut().remove(&addr);
                Ok(done)
            }
            DocValue::Map(entries) => {
                let addr = Rc::as_ptr(entries) as usize;
                if !self.path.borrow_mut().insert(addr) {
                    return Err(S::Error::custom("circular structure detected"));
                }
                let entries = entries.borrow();
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, item) in entries.iter() {
                    map.serialize_entry(key, &PathGuarded { value: item, path: self.path })?;
                }
                let done = map.end()?;
                self.path.borrow_mut().remove(&addr);
                Ok(done)
            }
        }
    }
}

fn write_guarded(out: &mut String, value: &DocValue, seen: &mut HashSet<usize>, depth: usize) {
    match value {
        DocValue::Null => out.push_str("null"),
        DocValue::Bool(flag) => out.push_str(if *flag { "true" } else { "false" }),
        DocValue::Int(number) => {
            let _ = write!(out, "{number}");
        }
        DocValue::Float(number) => {
            // serde_json writes non-finite floats as null; match it.
            out.push_str(&serde_json::to_string(number).unwrap_or_else(|_| "null".to_string()));
        }
        DocValue::Text(text) => out.push_str(&quoted(text)),
        DocValue::List(items) => {
            if !seen.insert(Rc::as_ptr(items) as usize) {
                out.push_str(&quoted(CIRCULAR_PLACEHOLDER));
                return;
            }
            let items = items.borrow();
            if items.is_empty() {
                out.push_str("[]");
                return;
            }
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(out, depth + 1);
                write_guarded(out, item, seen, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push(']');
        }
        DocValue::Map(entries) => {
            if !seen.insert(Rc::as_ptr(entries) as usize) {
                out.push_str(&quoted(CIRCULAR_PLACEHOLDER));
                return;
            }
            let entries = entries.borrow();
            if entries.is_empty() {
                out.push_str("{}");
                return;
            }
            out.push_str("{\n");
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(out, depth + 1);
                out.push_str(&quoted(key));
                out.push_str(": ");
                write_guarded(out, item, seen, depth + 1);
            }
            out.push('\n');
            indent(out, depth);
            out.push('}');
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn quoted(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

impl From<bool> for DocValue {
    fn from(value: bool) -> Self {
        DocValue::Bool(value)
    }
}

impl From<i64> for DocValue {
    fn from(value: i64) -> Self {
        DocValue::Int(value)
    }
}

impl From<i32> for DocValue {
    fn from(value: i32) -> Self {
        DocValue::Int(value.into())
    }
}

impl From<f64> for DocValue {
    fn from(value: f64) -> Self {
        DocValue::Float(value)
    }
}

impl From<&str> for DocValue {
    fn from(value: &str) -> Self {
        DocValue::Text(value.to_string())
    }
}

impl From<String> for DocValue {
    fn from(value: String) -> Self {
        DocValue::Text(value)
    }
}

impl From<Vec<DocValue>> for DocValue {
    fn from(items: Vec<DocValue>) -> Self {
        DocValue::List(Rc::new(RefCell::new(items)))
    }
}

impl From<Vec<String>> for DocValue {
    fn from(items: Vec<String>) -> Self {
        items
            .into_iter()
            .map(DocValue::Text)
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<chrono::DateTime<chrono::Utc>> for DocValue {
    fn from(stamp: chrono::DateTime<chrono::Utc>) -> Self {
        DocValue::Text(stamp.to_rfc3339())
    }
}

impl From<serde_json::Value> for DocValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DocValue::Null,
            serde_json::Value::Bool(flag) => DocValue::Bool(flag),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => DocValue::Int(int),
                None => DocValue::Float(number.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(text) => DocValue::Text(text),
            serde_json::Value::Array(items) => {
                items.into_iter().map(DocValue::from).collect::<Vec<_>>().into()
            }
            serde_json::Value::Object(entries) => {
                let converted: BTreeMap<String, DocValue> = entries
                    .into_iter()
                    .map(|(key, item)| (key, DocValue::from(item)))
                    .collect();
                DocValue::Map(Rc::new(RefCell::new(converted)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> DocValue {
        DocValue::from(json!({
            "title": "My first todo item",
            "completed": false,
            "count": 3,
            "ratio": 0.5,
            "tags": ["example", "first"],
            "updatedAt": null,
        }))
    }

    #[test]
    fn literal_parsing() {
        assert_eq!(DocValue::from_literal("null"), DocValue::Null);
        assert_eq!(DocValue::from_literal("true"), DocValue::Bool(true));
        assert_eq!(DocValue::from_literal("42"), DocValue::Int(42));
        assert_eq!(DocValue::from_literal("2.5"), DocValue::Float(2.5));
        assert_eq!(
            DocValue::from_literal("Buy milk"),
            DocValue::Text("Buy milk".to_string())
        );
    }

    #[test]
    fn collation_orders_types_then_values() {
        let ordered = [
            DocValue::Null,
            DocValue::Bool(false),
            DocValue::Bool(true),
            DocValue::Int(1),
            DocValue::Float(1.5),
            DocValue::Int(2),
            DocValue::Text("a".to_string()),
            DocValue::Text("b".to_string()),
            DocValue::from(vec![DocValue::Int(1)]),
        ];
        for pair in ordered.windows(2) {
            assert_ne!(pair[0].collate(&pair[1]), Ordering::Greater);
        }
    }

    #[test]
    fn prefix_matches_strings_and_lists() {
        let key = DocValue::from("My first todo item");
        assert!(key.starts_with(&DocValue::from("My")));
        assert!(!key.starts_with(&DocValue::from("Your")));

        let list_key = DocValue::from(vec![DocValue::from("a"), DocValue::from("b")]);
        assert!(list_key.starts_with(&DocValue::from(vec![DocValue::from("a")])));
        assert!(!list_key.starts_with(&DocValue::from(vec![DocValue::from("b")])));
    }

    #[test]
    fn pretty_matches_standard_serialization_for_acyclic_values() {
        let tree = sample_tree();
        // For acyclic values the lossy writer must produce the exact same
        // indented text as the standard path.
        assert_eq!(tree.to_pretty().unwrap(), tree.to_pretty_lossy());
    }

    #[test]
    fn shared_node_is_not_a_cycle_for_the_standard_path() {
        let shared = DocValue::new_list();
        shared.push(1);
        let root = DocValue::new_map();
        root.insert("a", shared.clone());
        root.insert("b", shared);

        let text = root.to_pretty().unwrap();
        // Both occurrences serialize in full.
        assert_eq!(text.matches('1').count(), 2);

        // The lossy writer replaces the second occurrence.
        let lossy = root.to_pretty_lossy();
        assert_eq!(lossy.matches(CIRCULAR_PLACEHOLDER).count(), 1);
    }

    #[test]
    fn cycle_fails_standard_path_and_survives_lossy_path() {
        let root = DocValue::new_map();
        root.insert("a", 1);
        root.insert("self", root.clone());

        let err = root.to_pretty().unwrap_err();
        assert!(err.to_string().contains("circular"));

        let lossy = root.to_pretty_lossy();
        assert!(lossy.contains(CIRCULAR_PLACEHOLDER));
        assert!(lossy.contains("\"a\": 1"));
    }

    #[test]
    fn self_referencing_list_terminates() {
        let items = DocValue::new_list();
        items.push(items.clone());
        items.push("tail");

        let lossy = items.to_pretty_lossy();
        assert_eq!(lossy.matches(CIRCULAR_PLACEHOLDER).count(), 1);
        assert!(lossy.contains("tail"));
    }

    #[test]
    fn field_lookup_on_converted_document() {
        let tree = sample_tree();
        assert_eq!(tree.field("completed"), Some(DocValue::Bool(false)));
        assert_eq!(tree.field("missing"), None);
    }
}
