//! Error types for configuration loading and the `tzshift` binary.
//!
//! Engine-level failures live in `tzshift_common::error`; this module adds
//! the file-system and output concerns of the front end.

use camino::Utf8PathBuf;
use thiserror::Error;
use tzshift_common::ConfigError;

/// Failures raised while loading and merging configuration.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path of the unreadable file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the malformed file.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        #[source]
        source: toml::de::Error,
    },

    /// The merged settings are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures surfaced by the `tzshift` binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or merged.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Planning rejected the effective settings.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing a report to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Serialising the JSON report failed.
    #[error("failed to encode JSON report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for binary-level results.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
