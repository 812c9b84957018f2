//! Three-way merge: conflict detection, resolution, unification and the
//! orchestrating [`Merger`].
//!
//! # Example
//!
//! ```
//! use nestdiff_core::config::MergeConfig;
//! use nestdiff_core::merge::{ActionRegistry, Merger, MergeState, Side};
//! use nestdiff_core::value::Value;
//! use serde_json::json;
//!
//! let mut merger = Merger::new(
//!     Value::from(json!({"replicas": 1})),
//!     Value::from(json!({"replicas": 2})),
//!     Value::from(json!({"replicas": 3})),
//!     ActionRegistry::new(),
//!     &MergeConfig::default(),
//! )?;
//!
//! let err = merger.run().unwrap_err();
//! assert!(err.is_unresolved_conflicts());
//!
//! merger.continue_run(&[Side::First])?;
//! assert_eq!(merger.state(), MergeState::Unified);
//! # Ok::<(), nestdiff_core::errors::NestDiffError>(())
//! ```

pub mod conflict;
pub mod merger;
pub mod registry;
pub mod resolver;
pub mod unifier;

pub use conflict::{find_conflicts, Conflict, Side};
pub use merger::{MergeState, Merger};
pub use registry::{
    ActionOutcome, ActionRegistry, PreferFirst, PreferSecond, ResolutionAction, ResolutionContext,
};
pub use resolver::Resolver;
pub use unifier::unify;
