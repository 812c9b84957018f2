#![allow(clippy::unwrap_used, clippy::expect_used)]

use nestdiff_core::config::DiffConfig;
use nestdiff_core::core_types::RunId;
use nestdiff_core::errors::{ExError, ExErrorKind, NestDiffError};

#[test]
fn test_path_not_found_verifiable_by_kind() {
    let err = NestDiffError::PathNotFound {
        path: "spec".to_string(),
        segment: "replicas".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::PathNotFound);
    assert_eq!(ex_err.code(), "ERR_PATH_NOT_FOUND");
    assert_eq!(ex_err.path(), Some("spec"));
    assert!(ex_err.message().contains("replicas"));
}

#[test]
fn test_unresolved_conflicts_carries_count() {
    let err = NestDiffError::UnresolvedConflicts { conflicts: vec![] };
    assert!(err.is_unresolved_conflicts());

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::UnresolvedConflicts);
    assert_eq!(ex_err.conflict_count(), Some(0));
}

#[test]
fn test_pick_count_mismatch_structured_fields() {
    let err = NestDiffError::PickCountMismatch {
        expected: 3,
        got: 1,
    };
    assert_eq!(
        err.to_string(),
        "Expected 3 pick(s) for unresolved conflicts, got 1"
    );

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.code(), "ERR_PICK_COUNT_MISMATCH");
    assert_eq!(ex_err.op(), Some("manual_resolve_conflicts"));
}

#[test]
fn test_invalid_merge_state_keeps_op() {
    let ex_err: ExError = NestDiffError::InvalidMergeState {
        op: "continue_run".to_string(),
        state: "Init".to_string(),
    }
    .into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidMergeState);
    assert_eq!(ex_err.op(), Some("continue_run"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::PathNotFound, "ERR_PATH_NOT_FOUND"),
        (ExErrorKind::IndexOutOfBounds, "ERR_INDEX_OUT_OF_BOUNDS"),
        (ExErrorKind::NotAContainer, "ERR_NOT_A_CONTAINER"),
        (ExErrorKind::SegmentMismatch, "ERR_SEGMENT_MISMATCH"),
        (ExErrorKind::InvalidSetPayload, "ERR_INVALID_SET_PAYLOAD"),
        (ExErrorKind::UnresolvedConflicts, "ERR_UNRESOLVED_CONFLICTS"),
        (ExErrorKind::PickCountMismatch, "ERR_PICK_COUNT_MISMATCH"),
        (ExErrorKind::ResolutionNotSet, "ERR_RESOLUTION_NOT_SET"),
        (ExErrorKind::InvalidMergeState, "ERR_INVALID_MERGE_STATE"),
        (ExErrorKind::InvalidPathPattern, "ERR_INVALID_PATH_PATTERN"),
        (ExErrorKind::Config, "ERR_CONFIG"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_config_decode_failure_maps_to_config_code() {
    let err = DiffConfig::from_toml_str("tolerance = \"loose\"").unwrap_err();
    assert!(matches!(err, NestDiffError::Config { .. }));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Config);
    assert_eq!(ex_err.code(), "ERR_CONFIG");
}

#[test]
fn test_builder_and_display() {
    let run_id = RunId::from_string("run-1".to_string());
    let err = ExError::new(ExErrorKind::Internal)
        .with_op("merge_run")
        .with_path("a.b")
        .with_run_id(run_id.clone())
        .with_message("boom");

    assert_eq!(err.run_id(), Some(&run_id));
    let rendered = err.to_string();
    assert!(rendered.starts_with("[ERR_INTERNAL]"));
    assert!(rendered.contains("merge_run"));
    assert!(rendered.contains("a.b"));
}

#[test]
fn test_source_chain() {
    let inner = ExError::new(ExErrorKind::PathNotFound).with_message("missing");
    let outer = ExError::new(ExErrorKind::Internal).with_source(inner);
    let source = std::error::Error::source(&outer).map(ToString::to_string);
    assert_eq!(source.as_deref(), Some("[ERR_PATH_NOT_FOUND]: missing"));
}
