//! Structural diff engine.
//!
//! Compares two [`Value`](crate::value::Value) trees and yields an ordered,
//! lazy sequence of [`PatchEntry`] values that turn the first tree into the
//! second when applied with [`crate::patch::apply`].
//!
//! ## Entry point
//!
//! ```ignore
//! use nestdiff_core::diff::{diff, DiffOptions};
//!
//! let opts = DiffOptions::default().with_expand(true);
//! for entry in diff(&before, &after, &opts) {
//!     println!("{}", entry);
//! }
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: map keys are visited in insertion order, so equal inputs
//!   produce identical entry sequences.
//! - **No aliasing**: every payload is an owned copy of the input data.
//! - **Bounded stack**: traversal uses an explicit work stack.

pub mod engine;
pub mod model;
pub mod options;

pub use engine::{diff, Diff};
pub use model::{PatchEntry, PatchOp};
pub use options::DiffOptions;
