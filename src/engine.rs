//! The runner adapter: plans each unit's combinations and runs the unit once
//! per combination inside an environment session.
//!
//! A host test runner owns one [`TzShiftEngine`] per test session. For each
//! unit it passes the unit's [`ScopeChain`] to [`TzShiftEngine::plan`] during
//! collection, then calls [`TzShiftEngine::run`] for every combination it
//! executes. Combinations run strictly one after another.

use log::debug;
use tzshift_common::{
    Availability, AvailabilityProber, CombinationPlan, Combination, ConfigError, Dimension,
    DimensionValue, EnvironmentSession, HostPort, LogSink, RunOutcome, ScopeChain, SessionError,
    SkipReason, Warning, WarningSink, plan, resolve_overrides,
};

use crate::host::system_ports;
use crate::settings::Settings;
use crate::shift::TzShift;

/// The outcome of one combination, labelled for the host runner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunReport<T> {
    index: usize,
    id: String,
    outcome: RunOutcome<T>,
}

impl<T> RunReport<T> {
    /// Combination index within the unit.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Display identifier of the combination.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether the unit ran or was skipped.
    #[must_use]
    pub const fn outcome(&self) -> &RunOutcome<T> {
        &self.outcome
    }

    /// Consumes the report, keeping the outcome.
    #[must_use]
    pub fn into_outcome(self) -> RunOutcome<T> {
        self.outcome
    }
}

/// Verdict for one configured value, as reported by `tzshift probe`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProbeReport {
    /// Dimension name.
    pub dimension: String,
    /// The probed value.
    pub value: String,
    /// Host verdict.
    pub availability: Availability,
}

/// Parametrisation engine bound to a set of host ports and a warning sink.
pub struct TzShiftEngine<S: WarningSink = LogSink> {
    settings: Settings,
    dimensions: Vec<Dimension>,
    ports: Vec<Box<dyn HostPort>>,
    prober: AvailabilityProber,
    sink: S,
}

impl TzShiftEngine {
    /// Engine driving this process's time zone and locale, logging warnings.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self::with_parts(settings, system_ports(), LogSink)
    }
}

impl<S: WarningSink> TzShiftEngine<S> {
    /// Engine over explicit ports and sink.
    ///
    /// `ports` are applied in the order given and restored in reverse.
    #[must_use]
    pub fn with_parts(settings: Settings, ports: Vec<Box<dyn HostPort>>, sink: S) -> Self {
        Self {
            dimensions: settings.dimensions(),
            settings,
            ports,
            prober: AvailabilityProber::new(),
            sink,
        }
    }

    /// The merged settings this engine runs with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The warning sink.
    #[must_use]
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Resolves `chain` and generates the unit's combinations.
    ///
    /// A truncated plan raises one [`Warning::Truncated`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when an override names an unknown dimension
    /// or a dimension resolves to no values.
    pub fn plan(&self, chain: &ScopeChain) -> Result<CombinationPlan, ConfigError> {
        let resolution = resolve_overrides(chain, &self.dimensions, self.settings.is_disabled())?;
        let names: Vec<&str> = self.dimensions.iter().map(Dimension::name).collect();
        let planned = plan(&resolution, &names, self.settings.cap())?;
        if let Some(truncation) = planned.truncation() {
            self.sink.warn(&Warning::Truncated { truncation });
        }
        Ok(planned)
    }

    /// Runs `unit` under `combination`.
    ///
    /// Every concrete value is probed first; an unusable value skips the run.
    /// Host settings are restored when the unit returns or unwinds. A value
    /// the host rejects at apply time also skips the run and raises
    /// [`Warning::ApplyFailed`].
    pub fn run<T, F>(&mut self, combination: &Combination, unit: F) -> RunOutcome<T>
    where
        F: FnOnce(TzShift<'_>) -> T,
    {
        if let Some(reason) = self.unavailable_value(combination) {
            debug!(
                target: "tzshift::engine",
                "skipping combination {}: {reason}",
                combination.id().trim_start(),
            );
            return RunOutcome::Skipped(reason);
        }

        let ports: Vec<&dyn HostPort> = self.ports.iter().map(AsRef::as_ref).collect();
        match EnvironmentSession::begin(&ports, combination) {
            Ok(session) => {
                debug!(
                    target: "tzshift::engine",
                    "running combination {}",
                    combination.id().trim_start(),
                );
                RunOutcome::Executed(unit(TzShift::new(session.context())))
            }
            Err(SessionError::Apply {
                dimension,
                value,
                source,
            }) => {
                let reason = source.to_string();
                self.sink.warn(&Warning::ApplyFailed {
                    dimension: dimension.clone(),
                    value: value.clone(),
                    reason: reason.clone(),
                });
                RunOutcome::Skipped(SkipReason::new(dimension, value, reason))
            }
        }
    }

    /// Plans `chain` and runs `unit` once per combination, in order.
    ///
    /// # Errors
    ///
    /// Returns the planning [`ConfigError`]; no combination runs in that case.
    pub fn run_unit<T, F>(
        &mut self,
        chain: &ScopeChain,
        mut unit: F,
    ) -> Result<Vec<RunReport<T>>, ConfigError>
    where
        F: FnMut(TzShift<'_>) -> T,
    {
        let planned = self.plan(chain)?;
        Ok(planned
            .combinations()
            .iter()
            .map(|combination| RunReport {
                index: combination.index(),
                id: combination.id().to_owned(),
                outcome: self.run(combination, &mut unit),
            })
            .collect())
    }

    /// Probes every configured concrete value.
    pub fn probe_configured(&mut self) -> Vec<ProbeReport> {
        let mut reports = Vec::new();
        for dimension in &self.dimensions {
            let Some(port) = self
                .ports
                .iter()
                .find(|port| port.dimension() == dimension.name())
            else {
                continue;
            };
            for raw in dimension.values() {
                let DimensionValue::Concrete(value) = dimension.resolve(raw) else {
                    continue;
                };
                let availability = self.prober.check(port.as_ref(), &value, &self.sink);
                reports.push(ProbeReport {
                    dimension: dimension.name().to_owned(),
                    value,
                    availability,
                });
            }
        }
        reports
    }

    fn unavailable_value(&mut self, combination: &Combination) -> Option<SkipReason> {
        for port in &self.ports {
            let Some(DimensionValue::Concrete(value)) = combination.value(port.dimension()) else {
                continue;
            };
            let verdict = self.prober.check(port.as_ref(), value, &self.sink);
            if !verdict.is_usable() {
                return Some(SkipReason::new(
                    port.dimension(),
                    value.as_str(),
                    verdict.reason().unwrap_or("not supported on this host"),
                ));
            }
        }
        None
    }
}
