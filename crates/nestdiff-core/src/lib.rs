//! nestdiff core - structural diff, patch and three-way merge for nested data
//!
//! This crate provides:
//! - A closed [`Value`] model (maps, sequences, sets, scalars)
//! - A lazy differ producing [`PatchEntry`] sequences
//! - Patch application, inversion and revert
//! - Three-way merging with conflict detection, wildcard-registered
//!   resolution actions and manual resolution
//! - Conversion of diffs into JSON-Patch style add/remove operations
//!
//! The core performs no I/O. Callers hand in snapshots and consume patches.

#[macro_use]
pub mod path;

pub mod config;
pub mod diff;
pub mod errors;
pub mod hashing;
pub mod json_patch;
pub mod logging_facility;
pub mod merge;
pub mod patch;
pub mod path_limit;
pub mod tolerance;
pub mod value;

pub use nestdiff_core_types as core_types;

// Re-export commonly used types
pub use config::{DiffConfig, MergeConfig};
pub use diff::{diff, Diff, DiffOptions, PatchEntry, PatchOp};
pub use errors::{ExError, ExErrorKind, NestDiffError, Result};
pub use json_patch::{patch_operations_from_json, to_patch_operations, PatchOperation};
pub use merge::{ActionOutcome, ActionRegistry, Conflict, MergeState, Merger, Side};
pub use patch::{apply, revert, swap};
pub use path::{Path, PathSegment};
pub use path_limit::PathLimit;
pub use value::{Scalar, Value};
