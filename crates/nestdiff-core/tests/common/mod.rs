use nestdiff_core::diff::{diff, DiffOptions, PatchEntry};
use nestdiff_core::value::Value;

/// Build a value from a JSON fixture
#[allow(dead_code)]
pub fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Collect the full diff between two JSON fixtures
#[allow(dead_code)]
pub fn diff_json(
    first: serde_json::Value,
    second: serde_json::Value,
    options: &DiffOptions,
) -> Vec<PatchEntry> {
    let (a, b) = (v(first), v(second));
    diff(&a, &b, options).collect()
}
