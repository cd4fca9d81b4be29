//! Shared step parameter types for the behaviour suites.
//!
//! Feature files quote their values; these wrappers strip the quotes and
//! split comma-separated lists before they reach step bodies.

pub mod steps;

pub use steps::{StepList, StepText};
