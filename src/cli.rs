//! Command-line layer for tzshift.
//!
//! [`TzShiftArgs`] carries the four flags that override the configuration
//! file. Host runners can `#[command(flatten)]` it into their own parser; the
//! `tzshift` binary wraps it in [`Cli`].

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Flags overriding the file-layer configuration.
#[derive(Args, Clone, Debug, Default, Eq, PartialEq)]
pub struct TzShiftArgs {
    /// Comma-separated time zones to test with (overrides `tz_timezones`).
    #[arg(long = "tz-timezones", value_name = "CSV")]
    pub timezones: Option<String>,

    /// Comma-separated locales to test with (overrides `tz_locales`).
    #[arg(long = "tz-locales", value_name = "CSV")]
    pub locales: Option<String>,

    /// Maximum combinations per test unit; 0 means unlimited.
    #[arg(long = "tzshift-max", value_name = "N", allow_hyphen_values = true)]
    pub max: Option<String>,

    /// Disable parametrisation; every unit runs once against host settings.
    #[arg(long = "no-tzshift")]
    pub disabled: bool,
}

/// Plan and probe timezone/locale test matrices.
#[derive(Debug, Parser)]
#[command(name = "tzshift", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Print the combinations a unit without scope overrides would run.
    Plan(PlanArgs),

    /// Check every configured value against this host.
    Probe(CommonArgs),
}

/// Arguments shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    /// Configuration file [default: ./tzshift.toml when present].
    #[arg(long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Configuration overrides.
    #[command(flatten)]
    pub tzshift: TzShiftArgs,
}

/// Arguments for `tzshift plan`.
#[derive(Args, Clone, Debug, Default)]
pub struct PlanArgs {
    /// Shared arguments.
    #[command(flatten)]
    pub common: CommonArgs,

    /// Emit the plan as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Splits a comma-separated flag value, trimming entries and dropping blanks.
#[must_use]
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_owned)
        .collect()
}
