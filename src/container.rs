//! The subscript capability the resolver walks through.
//!
//! Any nested-document type can be wrapped by implementing [`Subscript`]:
//! one step of indexed get, get-mut, set and delete. The resolver never looks
//! at concrete container types.

use crate::path::PathSegment;
use crate::value::Value;

/// Why a single step into a node failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepError {
    /// The node is indexable by this segment but has no such entry.
    Missing,
    /// The node cannot be indexed by this segment at all.
    NotIndexable,
}

pub type Step<T> = Result<T, StepError>;

/// Single-level indexed access on a nested document node.
pub trait Subscript: Sized {
    /// Short name of the node's kind, for diagnostics.
    fn kind(&self) -> &'static str;

    fn child(&self, segment: &PathSegment) -> Step<&Self>;

    fn child_mut(&mut self, segment: &PathSegment) -> Step<&mut Self>;

    /// Inserts or replaces the entry at `segment`.
    fn assign(&mut self, segment: &PathSegment, value: Self) -> Step<()>;

    /// Removes the entry at `segment`, returning it.
    fn remove(&mut self, segment: &PathSegment) -> Step<Self>;
}

// ============================================================================
// LIST HELPERS
// ============================================================================

fn list_position<T>(items: &[T], segment: &PathSegment) -> Step<usize> {
    match segment {
        PathSegment::Key(_) => Err(StepError::NotIndexable),
        PathSegment::Index(_) => segment.list_position(items.len()).ok_or(StepError::Missing),
    }
}

fn list_assign<T>(items: &mut [T], segment: &PathSegment, value: T) -> Step<()> {
    let pos = list_position(items, segment)?;
    items[pos] = value;
    Ok(())
}

fn list_remove<T>(items: &mut Vec<T>, segment: &PathSegment) -> Step<T> {
    let pos = list_position(items, segment)?;
    Ok(items.remove(pos))
}

// ============================================================================
// VALUE
// ============================================================================

impl Subscript for Value {
    fn kind(&self) -> &'static str {
        self.type_name()
    }

    fn child(&self, segment: &PathSegment) -> Step<&Self> {
        match (self, segment) {
            (Value::Map(map), PathSegment::Key(key)) => map.get(key).ok_or(StepError::Missing),
            (Value::List(items), _) => Ok(&items[list_position(items, segment)?]),
            _ => Err(StepError::NotIndexable),
        }
    }

    fn child_mut(&mut self, segment: &PathSegment) -> Step<&mut Self> {
        match (self, segment) {
            (Value::Map(map), PathSegment::Key(key)) => {
                map.get_mut(key).ok_or(StepError::Missing)
            }
            (Value::List(items), _) => {
                let pos = list_position(items, segment)?;
                Ok(&mut items[pos])
            }
            _ => Err(StepError::NotIndexable),
        }
    }

    fn assign(&mut self, segment: &PathSegment, value: Self) -> Step<()> {
        match (self, segment) {
            (Value::Map(map), PathSegment::Key(key)) => {
                map.insert(key.clone(), value);
                Ok(())
            }
            (Value::List(items), _) => list_assign(items, segment, value),
            _ => Err(StepError::NotIndexable),
        }
    }

    fn remove(&mut self, segment: &PathSegment) -> Step<Self> {
        match (self, segment) {
            (Value::Map(map), PathSegment::Key(key)) => {
                map.shift_remove(key).ok_or(StepError::Missing)
            }
            (Value::List(items), _) => list_remove(items, segment),
            _ => Err(StepError::NotIndexable),
        }
    }
}

// ============================================================================
// SERDE_JSON
// ============================================================================

impl Subscript for serde_json::Value {
    fn kind(&self) -> &'static str {
        match self {
            serde_json::Value::Null => "Null",
            serde_json::Value::Bool(_) => "Bool",
            serde_json::Value::Number(_) => "Number",
            serde_json::Value::String(_) => "String",
            serde_json::Value::Array(_) => "Array",
            serde_json::Value::Object(_) => "Object",
        }
    }

    fn child(&self, segment: &PathSegment) -> Step<&Self> {
        match (self, segment) {
            (serde_json::Value::Object(map), PathSegment::Key(key)) => {
                map.get(key).ok_or(StepError::Missing)
            }
            (serde_json::Value::Array(items), _) => Ok(&items[list_position(items, segment)?]),
            _ => Err(StepError::NotIndexable),
        }
    }

    fn child_mut(&mut self, segment: &PathSegment) -> Step<&mut Self> {
        match (self, segment) {
            (serde_json::Value::Object(map), PathSegment::Key(key)) => {
                map.get_mut(key).ok_or(StepError::Missing)
            }
            (serde_json::Value::Array(items), _) => {
                let pos = list_position(items, segment)?;
                Ok(&mut items[pos])
            }
            _ => Err(StepError::NotIndexable),
        }
    }

    fn assign(&mut self, segment: &PathSegment, value: Self) -> Step<()> {
        match (self, segment) {
            (serde_json::Value::Object(map), PathSegment::Key(key)) => {
                map.insert(key.clone(), value);
                Ok(())
            }
            (serde_json::Value::Array(items), _) => list_assign(items, segment, value),
            _ => Err(StepError::NotIndexable),
        }
    }

    fn remove(&mut self, segment: &PathSegment) -> Step<Self> {
        match (self, segment) {
            (serde_json::Value::Object(map), PathSegment::Key(key)) => {
                map.shift_remove(key).ok_or(StepError::Missing)
            }
            (serde_json::Value::Array(items), _) => list_remove(items, segment),
            _ => Err(StepError::NotIndexable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_steps_by_key_and_index() {
        let v = Value::map_from([("xs", Value::List(vec![Value::from(1_i64), Value::from(2_i64)]))]);
        let xs = v.child(&PathSegment::from("xs")).unwrap();
        assert_eq!(xs.child(&PathSegment::from(-1)), Ok(&Value::from(2_i64)));
        assert_eq!(xs.child(&PathSegment::from(2)), Err(StepError::Missing));
        assert_eq!(xs.child(&PathSegment::from("a")), Err(StepError::NotIndexable));
        assert_eq!(v.child(&PathSegment::from(0)), Err(StepError::NotIndexable));
    }

    #[test]
    fn value_list_assign_never_grows() {
        let mut v = Value::List(vec![Value::Nil]);
        assert_eq!(v.assign(&PathSegment::from(1), Value::Bool(true)), Err(StepError::Missing));
        assert_eq!(v.assign(&PathSegment::from(0), Value::Bool(true)), Ok(()));
        assert_eq!(v, Value::List(vec![Value::Bool(true)]));
    }

    #[test]
    fn json_remove_reports_missing_keys() {
        let mut v = json!({"a": 1});
        assert_eq!(v.remove(&PathSegment::from("b")), Err(StepError::Missing));
        assert_eq!(v.remove(&PathSegment::from("a")), Ok(json!(1)));
        assert_eq!(v, json!({}));
    }

    #[test]
    fn removing_a_key_keeps_sibling_order() {
        let mut v: Value = serde_json::from_str(r#"{"c": 1, "a": 2, "b": 3}"#).unwrap();
        v.remove(&PathSegment::from("c")).unwrap();
        v.assign(&PathSegment::from("d"), Value::Nil).unwrap();
        let keys: Vec<&str> = v.as_map().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "b", "d"]);

        let mut j = json!({"c": 1, "a": 2, "b": 3});
        j.remove(&PathSegment::from("a")).unwrap();
        assert_eq!(serde_json::to_string(&j).unwrap(), r#"{"c":1,"b":3}"#);
    }

    #[test]
    fn scalars_are_not_indexable() {
        let mut v = json!("text");
        assert_eq!(v.kind(), "String");
        assert_eq!(
            v.assign(&PathSegment::from("a"), json!(1)),
            Err(StepError::NotIndexable)
        );
    }
}
