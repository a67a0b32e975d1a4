//! The dynamic document type wrapped by property schemas.
//!
//! `Value` mirrors the shape of JSON and YAML documents: nil, booleans,
//! numbers, strings, lists and string-keyed maps. It deserializes from plain
//! JSON/YAML (no enum tags) and serializes back the same way, so a wrapped
//! document stays directly inspectable.
//!
//! Numbers keep their exact integer or float representation and maps keep
//! their key order, so a document written back after an edit differs only
//! where it was edited.

use indexmap::IndexMap;
use serde_json::Number;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A node in a nested document.
///
/// # Examples
///
/// ```rust
/// use propwrap::value::Value;
/// let n = Value::from(3.14);
/// assert_eq!(n.type_name(), "Number");
/// let s = Value::from("hello");
/// assert_eq!(s.as_str(), Some("hello"));
/// let nil = Value::default();
/// assert!(nil.is_nil());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Returns an empty map value.
    pub fn map() -> Self {
        Value::Map(IndexMap::new())
    }

    /// Builds a map value from key/value pairs.
    ///
    /// ```rust
    /// use propwrap::value::Value;
    /// let v = Value::map_from([("owner", Value::from("alice"))]);
    /// assert_eq!(v.as_map().map(|m| m.len()), Some(1));
    /// ```
    pub fn map_from<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the type name of the value as a string.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use propwrap::value::Value;
    /// let v = Value::Bool(true);
    /// assert_eq!(v.type_name(), "Bool");
    /// ```
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
        }
    }

    /// Returns true if the value is Nil.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns true for lists and maps, the nodes a path can step into.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// The number as a float, which may round integers beyond 2^53.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Display formatting helpers
    // ------------------------------------------------------------------------

    fn fmt_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            item.fmt_nested(f)?;
        }
        write!(f, "]")
    }

    fn fmt_map(f: &mut fmt::Formatter<'_>, map: &IndexMap<String, Value>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in map.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: ", key)?;
            value.fmt_nested(f)?;
        }
        write!(f, "}}")
    }

    // Strings are quoted inside containers so `["a b"]` stays readable.
    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::List(items) => Value::fmt_list(f, items),
            Value::Map(map) => Value::fmt_map(f, map),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// Non-finite floats have no document representation and become `Nil`.
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Value::Nil, Value::Number)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => serde_json::Value::Number(n),
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_plain_json() {
        let v: Value = serde_json::from_str(r#"{"labels": {"owner": "alice"}, "n": 3, "l": [true, null]}"#)
            .unwrap();
        let labels = v.as_map().unwrap().get("labels").unwrap();
        assert_eq!(
            labels.as_map().unwrap().get("owner"),
            Some(&Value::from("alice"))
        );
        assert_eq!(v.as_map().unwrap().get("n"), Some(&Value::from(3_i64)));
        assert_eq!(
            v.as_map().unwrap().get("l"),
            Some(&Value::List(vec![Value::Bool(true), Value::Nil]))
        );
    }

    #[test]
    fn serializes_numbers_as_written() {
        let v = Value::map_from([("n", Value::from(2_i64)), ("f", Value::from(0.5))]);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"n":2,"f":0.5}"#);
        assert!(Value::from(f64::NAN).is_nil());
    }

    #[test]
    fn large_integers_survive_a_round_trip() {
        let text = r#"{"id":9007199254740993,"neg":-9007199254740993,"max":18446744073709551615}"#;
        let v: Value = serde_json::from_str(text).unwrap();
        assert_eq!(v.as_map().unwrap()["id"].as_u64(), Some(9_007_199_254_740_993));
        assert_eq!(serde_json::to_string(&v).unwrap(), text);

        let yaml: Value = serde_yaml::from_str("id: 9007199254740993\nratio: 0.25\n").unwrap();
        assert_eq!(serde_yaml::to_string(&yaml).unwrap(), "id: 9007199254740993\nratio: 0.25\n");
    }

    #[test]
    fn maps_keep_document_key_order() {
        let v: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"zeta":1,"alpha":{"y":2,"b":3}}"#
        );
        assert_eq!(v.to_string(), r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}}"#);
    }

    #[test]
    fn converts_to_and_from_serde_json() {
        let json = json!({"a": [1, "two", {"b": false}]});
        let v = Value::from(json.clone());
        assert_eq!(serde_json::Value::from(v), json);
    }

    #[test]
    fn display_quotes_nested_strings_only() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(
            Value::List(vec![Value::from("x"), Value::from(1_i64)]).to_string(),
            r#"["x", 1]"#
        );
    }
}
