//! Structured logging for diff and merge runs.
//!
//! - One initialization point, [`init`], choosing a [`Profile`]
//! - Boundary macros `log_op_start!`, `log_op_end!`, `log_op_error!`
//! - An in-memory capture layer for test assertions
//!
//! Only the merger and the patch-format adapter own operation boundaries.
//! The differ, patcher and resolver emit `tracing::debug!` detail at most.
//!
//! # Usage
//!
//! ```rust
//! use nestdiff_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
