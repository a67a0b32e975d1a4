//! Get, set and delete values at the end of a path.
//!
//! The resolver walks a [`Subscript`] container one segment at a time.
//! Intermediate nodes must already exist; nothing is created on the way
//! down, and a failed set or delete leaves the container untouched.
//!
//! ```rust
//! use propwrap::{path, resolver};
//! use serde_json::json;
//!
//! let mut data = json!({"dk0": ["li0", ["ti0", "ti1"]], "dk1": "dv1"});
//! assert_eq!(*resolver::resolve_get(&data, &path!["dk0", 1, 0]).unwrap(), "ti0");
//! resolver::resolve_set(&mut data, &path!["dk1"], json!("new")).unwrap();
//! assert_eq!(data["dk1"], "new");
//! ```

use crate::container::{StepError, Subscript};
use crate::errors::PathError;
use crate::path::{Path, PathSegment};
use crate::property::Operation;
use log::trace;

fn step_error(
    found: &'static str,
    err: StepError,
    path: &Path,
    depth: usize,
    segment: &PathSegment,
) -> PathError {
    let prefix = path.prefix(depth);
    match err {
        StepError::Missing => PathError::Missing {
            segment: segment.clone(),
            prefix,
        },
        StepError::NotIndexable => PathError::NotIndexable {
            segment: segment.clone(),
            prefix,
            found,
        },
    }
}

fn walk<'a, C: Subscript>(
    root: &'a C,
    path: &Path,
    segments: &[PathSegment],
) -> Result<&'a C, PathError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        current = current
            .child(segment)
            .map_err(|e| step_error(current.kind(), e, path, depth, segment))?;
    }
    Ok(current)
}

fn walk_mut<'a, C: Subscript>(
    root: &'a mut C,
    path: &Path,
    segments: &[PathSegment],
) -> Result<&'a mut C, PathError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        let found = current.kind();
        current = current
            .child_mut(segment)
            .map_err(|e| step_error(found, e, path, depth, segment))?;
    }
    Ok(current)
}

/// Follows `path` as far as it resolves.
///
/// Returns the furthest reachable value and how many segments were consumed.
pub fn probe<'a, C: Subscript>(root: &'a C, path: &Path) -> (&'a C, usize) {
    let mut current = root;
    for (depth, segment) in path.iter().enumerate() {
        match current.child(segment) {
            Ok(next) => current = next,
            Err(_) => return (current, depth),
        }
    }
    (current, path.len())
}

/// Whether every segment of `path` resolves inside `root`.
pub fn path_valid<C: Subscript>(root: &C, path: &Path) -> bool {
    probe(root, path).1 == path.len()
}

/// Returns the value at the end of `path`.
///
/// An empty path addresses the root itself.
pub fn resolve_get<'a, C: Subscript>(root: &'a C, path: &Path) -> Result<&'a C, PathError> {
    trace!("get {}", path);
    walk(root, path, path.segments())
}

/// Returns a mutable reference to the value at the end of `path`.
pub fn resolve_get_mut<'a, C: Subscript>(
    root: &'a mut C,
    path: &Path,
) -> Result<&'a mut C, PathError> {
    trace!("get_mut {}", path);
    walk_mut(root, path, path.segments())
}

/// Assigns `value` at the terminal segment of `path`.
///
/// The parent of the terminal entry must exist. Map entries are inserted or
/// replaced; list entries must already be in range.
pub fn resolve_set<C: Subscript>(root: &mut C, path: &Path, value: C) -> Result<(), PathError> {
    trace!("set {}", path);
    let (last, parents) = path.split_last().ok_or(PathError::Empty {
        operation: Operation::Set,
    })?;
    let parent = walk_mut(root, path, parents)?;
    let found = parent.kind();
    parent
        .assign(last, value)
        .map_err(|e| step_error(found, e, path, parents.len(), last))
}

/// Removes and returns the value at the terminal segment of `path`.
pub fn resolve_delete<C: Subscript>(root: &mut C, path: &Path) -> Result<C, PathError> {
    trace!("delete {}", path);
    let (last, parents) = path.split_last().ok_or(PathError::Empty {
        operation: Operation::Delete,
    })?;
    let parent = walk_mut(root, path, parents)?;
    let found = parent.kind();
    parent
        .remove(last)
        .map_err(|e| step_error(found, e, path, parents.len(), last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use serde_json::json;

    #[test]
    fn get_walks_maps_and_lists() {
        let data = json!({"dk0": ["li0", ["ti0", "ti1"]], "dk1": "dv1"});
        assert_eq!(*resolve_get(&data, &path!["dk0", 1, 0]).unwrap(), "ti0");
        assert_eq!(*resolve_get(&data, &path!["dk0", -1, -1]).unwrap(), "ti1");
        assert_eq!(resolve_get(&data, &path![]).unwrap(), &data);
    }

    #[test]
    fn get_reports_missing_segment_and_prefix() {
        let data = json!({"a": {"b": 1}});
        let err = resolve_get(&data, &path!["a", "c", "d"]).unwrap_err();
        assert_eq!(
            err,
            PathError::Missing {
                segment: PathSegment::from("c"),
                prefix: path!["a"],
            }
        );
    }

    #[test]
    fn get_reports_scalars_as_not_indexable() {
        let data = json!({"a": 5});
        let err = resolve_get(&data, &path!["a", "b"]).unwrap_err();
        assert!(matches!(err, PathError::NotIndexable { found: "Number", .. }));
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut data = json!({"a": {"b": 1}, "l": [0, 0]});
        resolve_set(&mut data, &path!["a", "b"], json!("x")).unwrap();
        resolve_set(&mut data, &path!["l", 1], json!(true)).unwrap();
        assert_eq!(*resolve_get(&data, &path!["a", "b"]).unwrap(), "x");
        assert_eq!(*resolve_get(&data, &path!["l", 1]).unwrap(), true);
    }

    #[test]
    fn set_creates_terminal_but_not_intermediates() {
        let mut data = json!({"a": {}});
        resolve_set(&mut data, &path!["a", "new"], json!(1)).unwrap();
        assert_eq!(data, json!({"a": {"new": 1}}));

        let before = data.clone();
        let err = resolve_set(&mut data, &path!["missing", "key"], json!(1)).unwrap_err();
        assert!(matches!(err, PathError::Missing { .. }));
        assert_eq!(data, before);
    }

    #[test]
    fn set_out_of_range_index_fails() {
        let mut data = json!([1]);
        assert!(resolve_set(&mut data, &path![1], json!(2)).is_err());
        assert_eq!(data, json!([1]));
    }

    #[test]
    fn delete_removes_terminal_and_fails_when_absent() {
        let mut data = json!({"labels": {"owner": "alice"}});
        let removed = resolve_delete(&mut data, &path!["labels", "owner"]).unwrap();
        assert_eq!(removed, json!("alice"));
        assert_eq!(data, json!({"labels": {}}));
        let err = resolve_delete(&mut data, &path!["labels", "owner"]).unwrap_err();
        assert_eq!(err.valid_prefix(), Some(&path!["labels"]));
    }

    #[test]
    fn empty_path_cannot_be_set_or_deleted() {
        let mut data = json!({});
        assert_eq!(
            resolve_set(&mut data, &path![], json!(1)),
            Err(PathError::Empty { operation: Operation::Set })
        );
        assert!(matches!(
            resolve_delete(&mut data, &path![]),
            Err(PathError::Empty { .. })
        ));
    }

    #[test]
    fn probe_reports_furthest_valid_prefix() {
        let data = json!({"a": {"b": [1, 2]}});
        let (value, depth) = probe(&data, &path!["a", "b", 5]);
        assert_eq!(depth, 2);
        assert_eq!(value, &json!([1, 2]));
        assert!(path_valid(&data, &path!["a", "b", 1]));
        assert!(!path_valid(&data, &path!["a", "x"]));
    }
}
