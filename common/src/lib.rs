//! Core engine for running test units under every combination of time zone
//! and locale: scope resolution, combination generation, host ports, and the
//! scoped environment session that applies and restores them.

pub mod cap;
pub mod combination;
pub mod context;
pub mod diagnostics;
pub mod dimension;
pub mod error;
pub mod host;
pub mod outcome;
pub mod probe;
pub mod scope;
pub mod sentinel;
pub mod session;
pub mod test_support;

pub use cap::Cap;
pub use combination::{Combination, CombinationPlan, Truncation, generate, plan};
pub use context::{ActiveValue, RunContext};
pub use diagnostics::{LogSink, RecordingSink, Warning, WarningSink};
pub use dimension::{Dimension, dedup_preserving_order};
pub use error::{ConfigError, HostError, SessionError};
pub use host::{ApplyEffect, Availability, HostPort, Snapshot};
pub use outcome::{RunOutcome, SkipReason};
pub use probe::AvailabilityProber;
pub use scope::{
    DisableSource, Resolution, ResolvedDimension, ScopeChain, ScopeLevel, ScopeOverride,
    ValueSource, resolve_overrides,
};
pub use sentinel::{
    DimensionValue, SENTINEL, SENTINEL_LABEL, is_sentinel, resolve_sentinel, resolve_sentinel_with,
};
pub use session::{EnvironmentSession, with_host_lock};
