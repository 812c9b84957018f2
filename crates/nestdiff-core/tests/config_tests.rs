#![allow(clippy::unwrap_used, clippy::expect_used)]

use nestdiff_core::config::{DiffConfig, MergeConfig};
use nestdiff_core::diff::{diff, PatchEntry};
use nestdiff_core::errors::NestDiffError;
use nestdiff_core::value::Value;
use serde_json::json;

#[test]
fn test_merge_config_from_toml() {
    let config = MergeConfig::from_toml_str(
        r#"
        path_limits = ["spec.template", "data.*"]
        ignore = ["metadata.resourceVersion"]
        tolerance = 1e-9
        absolute_tolerance = 0.001
        "#,
    )
    .unwrap();

    assert_eq!(config.path_limits.len(), 2);
    assert_eq!(config.tolerance, 1e-9);
    assert_eq!(config.absolute_tolerance, Some(0.001));

    let options = config.to_diff_options().unwrap();
    assert!(options.expand);
}

#[test]
fn test_ignored_key_is_not_diffed() {
    let config = MergeConfig::from_toml_str(r#"ignore = ["metadata.resourceVersion"]"#).unwrap();
    let options = config.to_diff_options().unwrap();

    let a = Value::from(json!({"metadata": {"resourceVersion": "1", "name": "x"}}));
    let b = Value::from(json!({"metadata": {"resourceVersion": "2", "name": "y"}}));
    let entries: Vec<PatchEntry> = diff(&a, &b, &options).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path().to_string(), "metadata.name");
}

#[test]
fn test_wildcard_path_limit_from_config() {
    let config = MergeConfig::from_toml_str(r#"path_limits = ["data.*"]"#).unwrap();
    let options = config.to_diff_options().unwrap();

    let a = Value::from(json!({"data": {"blob": {"x": 1, "y": 1}}}));
    let b = Value::from(json!({"data": {"blob": {"x": 2, "y": 2}}}));
    let entries: Vec<PatchEntry> = diff(&a, &b, &options).collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path().to_string(), "data.blob");
}

#[test]
fn test_bad_pattern_surfaces_on_conversion() {
    let config = MergeConfig::from_toml_str(r#"path_limits = ["a.+"]"#).unwrap();
    let err = config.to_diff_options().unwrap_err();
    assert!(matches!(err, NestDiffError::InvalidPathPattern { .. }));
}

#[test]
fn test_malformed_toml() {
    let err = DiffConfig::from_toml_str("expand = ").unwrap_err();
    assert!(matches!(err, NestDiffError::Config { .. }));
}

#[test]
fn test_diff_config_without_limits_has_none() {
    let config = DiffConfig::from_toml_str("expand = true\ndot_notation = false").unwrap();
    let options = config.to_diff_options().unwrap();
    assert!(options.path_limit.is_none());
    assert!(!options.dot_notation);
    assert!(options.expand);
}
