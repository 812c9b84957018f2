#![allow(clippy::unwrap_used, clippy::expect_used)]

use nestdiff_core::json_patch::{
    patch_operations_from_json, to_patch_operations, PatchOperation, PatchOperationKind,
};
use nestdiff_core::value::Value;
use serde_json::json;

fn op(kind: PatchOperationKind, path: &str, value: Option<serde_json::Value>) -> PatchOperation {
    PatchOperation {
        op: kind,
        path: path.to_string(),
        value,
    }
}

#[test]
fn test_sequence_growth_replaces_whole_collection() {
    let ops = patch_operations_from_json(
        &json!({"x": {"y": [1, 2]}}),
        &json!({"x": {"y": [1, 2, 3]}}),
    )
    .unwrap();
    assert_eq!(
        ops,
        vec![
            op(PatchOperationKind::Remove, "/x/y", None),
            op(PatchOperationKind::Add, "/x/y", Some(json!([1, 2, 3]))),
        ]
    );
}

#[test]
fn test_map_edits_are_per_key() {
    let ops = patch_operations_from_json(
        &json!({"meta": {"name": "a", "old": 1}}),
        &json!({"meta": {"name": "b", "new": 2}}),
    )
    .unwrap();
    assert_eq!(
        ops,
        vec![
            op(PatchOperationKind::Add, "/meta/name", Some(json!("b"))),
            op(PatchOperationKind::Add, "/meta/new", Some(json!(2))),
            op(PatchOperationKind::Remove, "/meta/old", None),
        ]
    );
}

#[test]
fn test_multiple_edits_in_one_collection_emit_once() {
    let ops = patch_operations_from_json(
        &json!({"items": [{"n": 1}, {"n": 2}, {"n": 3}]}),
        &json!({"items": [{"n": 9}, {"n": 8}]}),
    )
    .unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[1].value, Some(json!([{"n": 9}, {"n": 8}])));
}

#[test]
fn test_nested_collection_uses_first_index() {
    let ops = patch_operations_from_json(
        &json!({"a": [[1], [2]]}),
        &json!({"a": [[1], [2, 3]]}),
    )
    .unwrap();
    assert_eq!(
        ops,
        vec![
            op(PatchOperationKind::Remove, "/a", None),
            op(PatchOperationKind::Add, "/a", Some(json!([[1], [2, 3]]))),
        ]
    );
}

#[test]
fn test_new_collection_is_plain_add() {
    let ops = patch_operations_from_json(&json!({}), &json!({"xs": [1]})).unwrap();
    assert_eq!(ops, vec![op(PatchOperationKind::Add, "/xs", Some(json!([1])))]);
}

#[test]
fn test_root_change() {
    let ops = patch_operations_from_json(&json!(1), &json!("x")).unwrap();
    assert_eq!(ops, vec![op(PatchOperationKind::Add, "", Some(json!("x")))]);
}

#[test]
fn test_identical_documents() {
    let doc = json!({"a": [1, 2], "b": {"c": null}});
    assert!(patch_operations_from_json(&doc, &doc).unwrap().is_empty());
}

#[test]
fn test_set_change_replaces_set() {
    let initial = Value::map().with("s", Value::set([1i64]));
    let updated = Value::map().with("s", Value::set([1i64, 2]));
    let ops = to_patch_operations(&initial, &updated).unwrap();
    assert_eq!(
        ops,
        vec![
            op(PatchOperationKind::Remove, "/s", None),
            op(PatchOperationKind::Add, "/s", Some(json!([1, 2]))),
        ]
    );
}

#[test]
fn test_wire_format() {
    let ops = patch_operations_from_json(&json!({"a": 1, "b": 1}), &json!({"a": 2})).unwrap();
    let wire = serde_json::to_value(&ops).unwrap();
    assert_eq!(
        wire,
        json!([
            {"op": "add", "path": "/a", "value": 2},
            {"op": "remove", "path": "/b"}
        ])
    );

    let parsed: Vec<PatchOperation> = serde_json::from_value(wire).unwrap();
    assert_eq!(parsed, ops);
}

#[test]
fn test_operations_follow_document_order() {
    let ops = patch_operations_from_json(
        &json!({"zeta": 0, "alpha": 0}),
        &json!({"zeta": 1, "alpha": 1, "mu": 2, "beta": 2}),
    )
    .unwrap();
    let paths: Vec<&str> = ops.iter().map(|o| o.path.as_str()).collect();
    assert_eq!(paths, vec!["/zeta", "/alpha", "/mu", "/beta"]);
}
