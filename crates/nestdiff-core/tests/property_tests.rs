#![allow(clippy::unwrap_used, clippy::expect_used)]

use nestdiff_core::diff::{diff, DiffOptions, PatchEntry};
use nestdiff_core::hashing::canonical_hash;
use nestdiff_core::patch::{apply, revert};
use nestdiff_core::path_limit::PathLimit;
use nestdiff_core::value::{Scalar, Value};
use proptest::prelude::*;

fn arb_scalar() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        (-5i64..5).prop_map(Scalar::Int),
        "[x-z]".prop_map(Scalar::String),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::null()),
        any::<bool>().prop_map(Value::from),
        (-50i64..50).prop_map(Value::from),
        "[a-c]{0,2}".prop_map(Value::from),
    ]
}

// Keys come from a small alphabet so that two generated maps overlap
fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|m| Value::Map(m.into_iter().collect())),
            prop::collection::btree_set(arb_scalar(), 0..4).prop_map(Value::Set),
        ]
    })
}

fn entries(first: &Value, second: &Value, options: &DiffOptions) -> Vec<PatchEntry> {
    diff(first, second, options).collect()
}

proptest! {
    #[test]
    fn prop_expanded_diff_round_trips(a in arb_value(), b in arb_value()) {
        let options = DiffOptions::default().with_expand(true);
        let patch = entries(&a, &b, &options);
        prop_assert_eq!(apply(&patch, &a).unwrap(), b);
    }

    #[test]
    fn prop_path_limited_diff_round_trips(a in arb_value(), b in arb_value()) {
        let options = DiffOptions::default()
            .with_expand(true)
            .with_path_limit(PathLimit::new());
        let patch = entries(&a, &b, &options);
        prop_assert_eq!(apply(&patch, &a).unwrap(), b);
    }

    #[test]
    fn prop_batched_diff_round_trips(a in arb_value(), b in arb_value()) {
        let patch = entries(&a, &b, &DiffOptions::default());
        prop_assert_eq!(apply(&patch, &a).unwrap(), b);
    }

    #[test]
    fn prop_revert_inverts_diff(a in arb_value(), b in arb_value()) {
        let patch = entries(&a, &b, &DiffOptions::default());
        prop_assert_eq!(revert(&patch, &b).unwrap(), a);
    }

    #[test]
    fn prop_self_diff_is_empty(a in arb_value()) {
        prop_assert!(entries(&a, &a, &DiffOptions::default().with_expand(true)).is_empty());
    }

    #[test]
    fn prop_equal_values_hash_equal(a in arb_value()) {
        let reordered = match &a {
            Value::Map(m) => Value::Map(m.iter().rev().map(|(k, v)| (k.clone(), v.clone())).collect()),
            other => other.clone(),
        };
        prop_assert_eq!(canonical_hash(&a), canonical_hash(&reordered));
    }
}
