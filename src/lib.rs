//! tzshift runs test units under every combination of time zone and locale.
//!
//! This crate supplies the concrete host ports, the configuration layers, and
//! the [`TzShiftEngine`] runner adapter on top of the `tzshift-common` engine.
//!
//! ```no_run
//! use tzshift::{Settings, TzShiftEngine, TzShiftMarker};
//! use tzshift_common::{ScopeChain, ScopeOverride};
//!
//! let mut engine = TzShiftEngine::new(Settings::default().with_locales(["C"]));
//! let chain = ScopeChain::new().with(ScopeOverride::function().timezones(["UTC", "Asia/Tokyo"]));
//! let reports = engine.run_unit(&chain, |shift| shift.timezone().to_owned())?;
//! assert_eq!(reports.len(), 2);
//! # Ok::<(), tzshift_common::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod markers;
pub mod settings;
pub mod shift;

pub use cli::{Cli, Command, CommonArgs, PlanArgs, TzShiftArgs};
pub use config::{DEFAULT_CONFIG_FILE, TzShiftConfig};
pub use engine::{ProbeReport, RunReport, TzShiftEngine};
pub use error::{CliError, LoadError};
pub use host::{LocalePort, TimezonePort, system_ports};
pub use markers::TzShiftMarker;
pub use settings::{DEFAULT_LOCALES, DEFAULT_TIMEZONES, LOCALE, Settings, TIMEZONE};
pub use shift::TzShift;
