//! Conversion of diffs into JSON-Patch style operations.
//!
//! Only `add` and `remove` are produced. A changed value is written as an
//! `add` over the old one. Anything inside a sequence or a set is replaced
//! wholesale: the collection at the path before the first index is removed
//! and re-added with its new content, once per collection.

use crate::diff::{diff, DiffOptions, PatchEntry};
use crate::errors::Result;
use crate::path::{lookup, Path, PathSegment};
use crate::value::Value;
use crate::{log_op_end, log_op_error, log_op_start};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOperationKind {
    Add,
    Remove,
}

/// One operation addressed by an RFC 6901 pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOperationKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl PatchOperation {
    pub fn add(path: &Path, value: &Value) -> Self {
        Self {
            op: PatchOperationKind::Add,
            path: path.to_json_pointer(),
            value: Some(serde_json::Value::from(value)),
        }
    }

    pub fn remove(path: &Path) -> Self {
        Self {
            op: PatchOperationKind::Remove,
            path: path.to_json_pointer(),
            value: None,
        }
    }
}

/// Operations turning `initial` into `updated`.
///
/// # Errors
///
/// Returns a lookup error if a replaced collection cannot be found in
/// `updated`, which indicates an inconsistent diff.
pub fn to_patch_operations(initial: &Value, updated: &Value) -> Result<Vec<PatchOperation>> {
    let start = Instant::now();
    log_op_start!("to_patch_operations");

    let result = convert(initial, updated);
    let duration_ms = start.elapsed().as_millis() as u64;
    match &result {
        Ok(operations) => log_op_end!(
            "to_patch_operations",
            duration_ms = duration_ms,
            operation_count = operations.len()
        ),
        Err(err) => log_op_error!("to_patch_operations", err.clone(), duration_ms = duration_ms),
    }
    result
}

/// [`to_patch_operations`] over JSON documents.
///
/// # Errors
///
/// Same as [`to_patch_operations`].
pub fn patch_operations_from_json(
    initial: &serde_json::Value,
    updated: &serde_json::Value,
) -> Result<Vec<PatchOperation>> {
    to_patch_operations(&Value::from(initial.clone()), &Value::from(updated.clone()))
}

fn convert(initial: &Value, updated: &Value) -> Result<Vec<PatchOperation>> {
    let options = DiffOptions::new().with_expand(true).with_dot_notation(false);
    let mut operations = Vec::new();
    let mut replaced: HashSet<Path> = HashSet::new();

    for entry in diff(initial, updated, &options) {
        let touched = entry.conflict_path();
        if let Some(position) = touched.first_index_position() {
            let collection = touched.prefix(position);
            if replaced.insert(collection.clone()) {
                operations.push(PatchOperation::remove(&collection));
                operations.push(PatchOperation::add(&collection, lookup(updated, &collection)?));
            }
            continue;
        }

        match &entry {
            PatchEntry::Add { path, items } => {
                for (key, value) in items {
                    operations.push(PatchOperation::add(&child(path, key), value));
                }
            }
            PatchEntry::Remove { path, items } => {
                for (key, _) in items {
                    operations.push(PatchOperation::remove(&child(path, key)));
                }
            }
            PatchEntry::Change { path, new, .. } => {
                operations.push(PatchOperation::add(path, new));
            }
        }
    }
    Ok(operations)
}

fn child(path: &Path, key: &PathSegment) -> Path {
    path.child(key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ops(a: serde_json::Value, b: serde_json::Value) -> Vec<PatchOperation> {
        patch_operations_from_json(&a, &b).unwrap()
    }

    #[test]
    fn test_change_becomes_add() {
        let out = ops(json!({"a": 1}), json!({"a": 2}));
        assert_eq!(
            out,
            vec![PatchOperation {
                op: PatchOperationKind::Add,
                path: "/a".to_string(),
                value: Some(json!(2)),
            }]
        );
    }

    #[test]
    fn test_sequence_edit_replaces_collection_once() {
        let out = ops(json!({"xs": [1, 2, 3]}), json!({"xs": [9, 2]}));
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].op, PatchOperationKind::Remove);
        assert_eq!(out[0].path, "/xs");
        assert_eq!(out[1].op, PatchOperationKind::Add);
        assert_eq!(out[1].value, Some(json!([9, 2])));
    }

    #[test]
    fn test_pointer_escaping() {
        let out = ops(json!({}), json!({"a/b": {"c~d": 1}}));
        assert_eq!(out[0].path, "/a~1b");
    }

    #[test]
    fn test_remove_has_no_value_when_serialized() {
        let out = ops(json!({"a": 1}), json!({}));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!([{"op": "remove", "path": "/a"}])
        );
    }

    #[test]
    fn test_set_edit_replaces_set() {
        let initial = Value::map().with("s", Value::set([1i64, 2]));
        let updated = Value::map().with("s", Value::set([2i64, 3]));
        let out = to_patch_operations(&initial, &updated).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].path, "/s");
        assert_eq!(out[1].value, Some(json!([2, 3])));
    }
}
