//! Shared step parameter types for the engine's behaviour suites.
//!
//! Feature files quote their values (`"UTC, Asia/Tokyo"`); these wrappers
//! strip the quotes and split comma-separated lists so step bodies receive
//! plain strings.

pub mod steps;

pub use steps::{StepList, StepText};
