//! Core types shared across nestdiff facilities
//!
//! This crate provides foundational types used by the logging facility
//! and the merge orchestration:
//!
//! - **Correlation types**: RunId, RunContext
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::{RunContext, RunId};
