//! Error types shared by the resolution, generation, and session layers.
//!
//! Only [`ConfigError`] is fatal: it aborts collection of the affected test
//! unit. Host and session errors degrade to per-combination skips.

use thiserror::Error;

/// Configuration problems detected while planning a test unit.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// A dimension resolved to an empty value list.
    #[error("tzshift: no values to test with for dimension `{dimension}`")]
    EmptyDimension {
        /// Name of the dimension that has no values.
        dimension: String,
    },
    /// A scope override names a dimension that is not configured.
    #[error("tzshift: override names unknown dimension `{dimension}`")]
    UnknownDimension {
        /// The unrecognised dimension name.
        dimension: String,
    },
    /// Two configured dimensions share a name.
    #[error("tzshift: dimension `{dimension}` is configured more than once")]
    DuplicateDimension {
        /// The repeated dimension name.
        dimension: String,
    },
    /// The combination cap is not an integer.
    #[error("tzshift: --tzshift-max must be an integer, got `{raw}`")]
    InvalidCap {
        /// The rejected input.
        raw: String,
    },
    /// The combination cap is negative.
    #[error("tzshift: --tzshift-max cannot be negative, got {value}")]
    NegativeCap {
        /// The rejected value.
        value: i64,
    },
}

/// Failures reported by a host environment port.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum HostError {
    /// The host refused the requested value.
    #[error("{dimension} `{value}` rejected by host: {reason}")]
    Rejected {
        /// Dimension being applied.
        dimension: String,
        /// Value the host refused.
        value: String,
        /// Host-supplied explanation.
        reason: String,
    },
    /// The value cannot be represented for the host call (e.g. interior NUL).
    #[error("{dimension} `{value}` is not a valid host setting")]
    InvalidValue {
        /// Dimension being applied.
        dimension: String,
        /// The malformed value.
        value: String,
    },
}

/// Failures raised while opening an environment session.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SessionError {
    /// Applying a dimension's value failed; earlier dimensions were restored.
    #[error("failed to apply {dimension} `{value}`")]
    Apply {
        /// Dimension whose apply step failed.
        dimension: String,
        /// Value that could not be applied.
        value: String,
        /// Underlying host failure.
        #[source]
        source: HostError,
    },
}
