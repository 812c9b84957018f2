#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::v;
use nestdiff_core::config::MergeConfig;
use nestdiff_core::diff::PatchEntry;
use nestdiff_core::errors::NestDiffError;
use nestdiff_core::merge::{
    find_conflicts, unify, ActionOutcome, ActionRegistry, MergeState, Merger, PreferFirst,
    PreferSecond, ResolutionContext, Resolver, Side,
};
use nestdiff_core::patch::apply;
use nestdiff_core::path::PathSegment;
use nestdiff_core::value::Value;
use nestdiff_core::path;
use serde_json::json;

fn merger_with(
    ancestor: serde_json::Value,
    first: serde_json::Value,
    second: serde_json::Value,
    actions: ActionRegistry,
) -> Merger {
    Merger::new(v(ancestor), v(first), v(second), actions, &MergeConfig::default()).unwrap()
}

#[test]
fn test_conflicting_changes_need_resolution() {
    let first = vec![PatchEntry::change(path!["a"], Value::from(1i64), Value::from(2i64))];
    let second = vec![PatchEntry::change(path!["a"], Value::from(1i64), Value::from(3i64))];
    let mut conflicts = find_conflicts(&first, &second);
    assert_eq!(conflicts.len(), 1);

    let mut resolver = Resolver::default();
    let err = resolver
        .resolve_conflicts(&first, &second, &mut conflicts)
        .unwrap_err();
    assert!(err.is_unresolved_conflicts());

    let actions = ActionRegistry::new().with("a", PreferFirst).unwrap();
    let mut resolver = Resolver::new(actions, None);
    resolver
        .resolve_conflicts(&first, &second, &mut conflicts)
        .unwrap();
    assert_eq!(conflicts[0].take, Some(Side::First));
}

#[test]
fn test_clean_merge_applies_to_ancestor() {
    let ancestor = json!({"name": "web", "spec": {"replicas": 1}, "labels": {}});
    let first = json!({"name": "web", "spec": {"replicas": 2}, "labels": {}});
    let second = json!({"name": "web", "spec": {"replicas": 1}, "labels": {"tier": "fe"}});

    let mut merger = merger_with(ancestor.clone(), first, second, ActionRegistry::new());
    merger.run().unwrap();
    assert_eq!(merger.state(), MergeState::Unified);

    let merged = apply(merger.unified_patches(), &v(ancestor)).unwrap();
    assert_eq!(
        merged,
        v(json!({"name": "web", "spec": {"replicas": 2}, "labels": {"tier": "fe"}}))
    );
}

#[test]
fn test_branch_patches_are_expanded() {
    let mut merger = merger_with(
        json!({"xs": []}),
        json!({"xs": [1, 2]}),
        json!({"xs": []}),
        ActionRegistry::new(),
    );
    merger.run().unwrap();
    assert_eq!(merger.first_patches().len(), 2);
    assert!(merger.second_patches().is_empty());
}

#[test]
fn test_manual_resolution_flow() {
    let mut merger = merger_with(
        json!({"a": 1, "b": 1}),
        json!({"a": 2, "b": 2}),
        json!({"a": 3, "b": 3}),
        ActionRegistry::new(),
    );

    let err = merger.run().unwrap_err();
    match &err {
        NestDiffError::UnresolvedConflicts { conflicts } => assert_eq!(conflicts.len(), 2),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(merger.state(), MergeState::AwaitingManualResolution);

    let err = merger.continue_run(&[Side::First]).unwrap_err();
    assert_eq!(err, NestDiffError::PickCountMismatch { expected: 2, got: 1 });
    assert_eq!(merger.state(), MergeState::AwaitingManualResolution);
    assert_eq!(merger.unresolved_conflicts().len(), 2);

    merger.continue_run(&[Side::First, Side::Second]).unwrap();
    assert_eq!(merger.state(), MergeState::Unified);

    let merged = apply(merger.unified_patches(), merger.ancestor()).unwrap();
    assert_eq!(merged, v(json!({"a": 2, "b": 3})));
}

#[test]
fn test_equal_branch_edits_auto_resolve() {
    let mut merger = merger_with(
        json!({"a": 1}),
        json!({"a": 5}),
        json!({"a": 5}),
        ActionRegistry::new(),
    );
    merger.run().unwrap();
    assert_eq!(merger.conflicts().len(), 1);
    assert_eq!(merger.unified_patches().len(), 1);
}

#[test]
fn test_removal_versus_nested_edit() {
    let mut merger = merger_with(
        json!({"cfg": {"x": 1}, "keep": true}),
        json!({"keep": true}),
        json!({"cfg": {"x": 2}, "keep": true}),
        ActionRegistry::new().with("cfg.*", PreferFirst).unwrap(),
    );
    merger.run().unwrap();
    let merged = apply(merger.unified_patches(), merger.ancestor()).unwrap();
    assert_eq!(merged, v(json!({"keep": true})));
}

#[test]
fn test_plus_wildcard_only_covers_children() {
    let actions = ActionRegistry::new().with("spec.+", PreferSecond).unwrap();
    let mut merger = merger_with(
        json!({"spec": {"a": 1}}),
        json!({"spec": {"a": 2}}),
        json!({"spec": {"a": 3}}),
        actions,
    );
    merger.run().unwrap();
    assert_eq!(merger.conflicts()[0].take, Some(Side::Second));
}

#[test]
fn test_action_receives_extra_context() {
    let actions = ActionRegistry::new()
        .with("replicas", |ctx: &ResolutionContext<'_>| {
            let wants_max = ctx
                .extra
                .and_then(|e| match e {
                    Value::Map(m) => m.get("policy").cloned(),
                    _ => None,
                })
                == Some(Value::from("max"));
            if !wants_max {
                return ActionOutcome::NotApplicable;
            }
            match (ctx.first, ctx.second) {
                (
                    PatchEntry::Change { new: a, .. },
                    PatchEntry::Change { new: b, .. },
                ) if a.as_f64() >= b.as_f64() => ActionOutcome::Handled(Side::First),
                _ => ActionOutcome::Handled(Side::Second),
            }
        })
        .unwrap();

    let mut merger = Merger::new(
        v(json!({"replicas": 1})),
        v(json!({"replicas": 4})),
        v(json!({"replicas": 2})),
        actions,
        &MergeConfig::default(),
    )
    .unwrap()
    .with_extra(v(json!({"policy": "max"})));

    merger.run().unwrap();
    let merged = apply(merger.unified_patches(), merger.ancestor()).unwrap();
    assert_eq!(merged, v(json!({"replicas": 4})));
}

#[test]
fn test_fatal_action_leaves_conflict_for_manual_pick() {
    let actions = ActionRegistry::new()
        .with("a.b", |_: &ResolutionContext<'_>| ActionOutcome::Fatal)
        .unwrap()
        .with("a", PreferFirst)
        .unwrap();
    let mut merger = merger_with(
        json!({"a": {"b": 1}}),
        json!({"a": {"b": 2}}),
        json!({"a": {"b": 3}}),
        actions,
    );
    assert!(merger.run().unwrap_err().is_unresolved_conflicts());
    merger.continue_run(&[Side::Second]).unwrap();
    let merged = apply(merger.unified_patches(), merger.ancestor()).unwrap();
    assert_eq!(merged, v(json!({"a": {"b": 3}})));
}

#[test]
fn test_unify_orders_by_path() {
    let first = vec![PatchEntry::add(
        path![],
        vec![(PathSegment::key("z"), Value::from(1i64))],
    )];
    let second = vec![PatchEntry::add(
        path![],
        vec![(PathSegment::key("a"), Value::from(1i64))],
    )];
    let unified = unify(&first, &second, &[]).unwrap();
    assert_eq!(unified[0], second[0]);
    assert_eq!(unified[1], first[0]);
}

#[test]
fn test_invalid_path_limit_rejected_at_construction() {
    let config = MergeConfig {
        path_limits: vec!["a..b".to_string()],
        ..MergeConfig::default()
    };
    let err = Merger::new(Value::map(), Value::map(), Value::map(), ActionRegistry::new(), &config)
        .unwrap_err();
    assert!(matches!(err, NestDiffError::InvalidPathPattern { .. }));
}
