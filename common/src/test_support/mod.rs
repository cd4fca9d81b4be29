//! Shared test helpers for tzshift crates.
//!
//! [`FakePort`] stands in for a real host mechanism so sessions, probes, and
//! the runner adapter can be exercised without touching process-global state.
//! Clones share state, which lets a test hand one clone to the engine and keep
//! another for assertions.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::HostError;
use crate::host::{ApplyEffect, Availability, HostPort, Snapshot};

/// Ordered record of host mutations shared between fake ports.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    events: Rc<RefCell<Vec<String>>>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded events, e.g. `apply timezone UTC`.
    #[must_use]
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    fn record(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

#[derive(Debug)]
struct FakeState {
    current: Option<String>,
    unset_label: String,
    rejected: BTreeSet<String>,
    unusable: BTreeSet<String>,
    effect: ApplyEffect,
    probes: usize,
}

/// In-memory [`HostPort`] recording every apply and restore.
#[derive(Clone, Debug)]
pub struct FakePort {
    dimension: String,
    state: Rc<RefCell<FakeState>>,
    journal: Journal,
}

impl FakePort {
    /// A port whose host setting starts at `initial`.
    #[must_use]
    pub fn new(dimension: impl Into<String>, initial: impl Into<String>) -> Self {
        Self::build(dimension.into(), Some(initial.into()), String::new())
    }

    /// A port whose host setting starts unset, reported as `label`.
    #[must_use]
    pub fn unset(dimension: impl Into<String>, label: impl Into<String>) -> Self {
        Self::build(dimension.into(), None, label.into())
    }

    fn build(dimension: String, current: Option<String>, unset_label: String) -> Self {
        Self {
            dimension,
            state: Rc::new(RefCell::new(FakeState {
                current,
                unset_label,
                rejected: BTreeSet::new(),
                unusable: BTreeSet::new(),
                effect: ApplyEffect::Effective,
                probes: 0,
            })),
            journal: Journal::new(),
        }
    }

    /// Makes `apply` fail for each of `values` while `probe` still reports
    /// them usable, modelling a failure only discovered at apply time.
    #[must_use]
    pub fn rejecting<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .borrow_mut()
            .rejected
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Makes `probe` report each of `values` as unusable.
    #[must_use]
    pub fn unusable<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .borrow_mut()
            .unusable
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Marks the port's apply step as ineffective on this "platform".
    #[must_use]
    pub fn ineffective(self, reason: impl Into<String>) -> Self {
        self.state.borrow_mut().effect = ApplyEffect::Ineffective {
            reason: reason.into(),
        };
        self
    }

    /// Records events into a journal shared with other ports.
    #[must_use]
    pub fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = journal.clone();
        self
    }

    /// The current host setting.
    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.state.borrow().current.clone()
    }

    /// Overwrites the host setting, as another process-level actor would.
    pub fn set_current(&self, value: Option<&str>) {
        self.state.borrow_mut().current = value.map(str::to_owned);
    }

    /// Number of times `probe` ran.
    #[must_use]
    pub fn probe_count(&self) -> usize {
        self.state.borrow().probes
    }

    /// The journal this port writes to.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn write(&self, verb: &str, snapshot: &Snapshot) {
        self.state.borrow_mut().current = snapshot.setting().map(str::to_owned);
        self.journal.record(format!(
            "{verb} {} {}",
            self.dimension,
            snapshot.setting().unwrap_or("<unset>"),
        ));
    }
}

impl HostPort for FakePort {
    fn dimension(&self) -> &str {
        &self.dimension
    }

    fn capture(&self) -> Snapshot {
        let state = self.state.borrow();
        state.current.as_ref().map_or_else(
            || Snapshot::unset(state.unset_label.clone()),
            Snapshot::value,
        )
    }

    fn apply(&self, snapshot: &Snapshot) -> Result<(), HostError> {
        let rejected = snapshot
            .setting()
            .filter(|value| self.state.borrow().rejected.contains(*value));
        if let Some(value) = rejected {
            self.journal
                .record(format!("reject {} {value}", self.dimension));
            return Err(HostError::Rejected {
                dimension: self.dimension.clone(),
                value: value.to_owned(),
                reason: "not installed".to_owned(),
            });
        }
        self.write("apply", snapshot);
        Ok(())
    }

    fn restore(&self, snapshot: &Snapshot) {
        self.write("restore", snapshot);
    }

    fn probe(&self, value: &str) -> Availability {
        let unusable = {
            let mut state = self.state.borrow_mut();
            state.probes += 1;
            state.unusable.contains(value)
        };
        if unusable {
            Availability::unusable(format!("{} `{value}` not installed", self.dimension))
        } else {
            self.apply_effect().into_availability()
        }
    }

    fn apply_effect(&self) -> ApplyEffect {
        self.state.borrow().effect.clone()
    }
}
