//! The warning channel surfaced to the host test runner.
//!
//! Warnings never abort a unit. They are delivered to a [`WarningSink`]:
//! [`LogSink`] forwards them to the `log` facade, while [`RecordingSink`]
//! keeps them for assertions.

use std::cell::RefCell;
use std::fmt;

use log::warn;

use crate::combination::Truncation;

/// Non-fatal conditions raised while planning or running combinations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    /// The cap dropped combinations from a unit. Raised once per unit.
    Truncated {
        /// Combinations kept versus the full product size.
        truncation: Truncation,
    },
    /// The host cannot honour a value. Raised once per distinct value.
    Unavailable {
        /// Dimension of the value.
        dimension: String,
        /// The unusable value.
        value: String,
        /// Probe explanation.
        reason: String,
    },
    /// Applying a value failed at run time. Raised for every affected run.
    ApplyFailed {
        /// Dimension of the value.
        dimension: String,
        /// The value that failed to apply.
        value: String,
        /// Host explanation.
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { truncation } => write!(
                formatter,
                "tzshift: limiting parameterisation to first {} of {} combinations (see --tzshift-max)",
                truncation.kept, truncation.total,
            ),
            Self::Unavailable {
                dimension,
                value,
                reason,
            } => write!(
                formatter,
                "tzshift: skipping runs using unavailable {dimension} `{value}`: {reason}",
            ),
            Self::ApplyFailed {
                dimension,
                value,
                reason,
            } => write!(
                formatter,
                "tzshift: could not apply {dimension} `{value}`: {reason}",
            ),
        }
    }
}

/// Receiver for [`Warning`]s.
pub trait WarningSink {
    /// Delivers one warning.
    fn warn(&self, warning: &Warning);
}

impl<T: WarningSink + ?Sized> WarningSink for &T {
    fn warn(&self, warning: &Warning) {
        (**self).warn(warning);
    }
}

/// Sink that logs every warning at `warn` level under the `tzshift` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn warn(&self, warning: &Warning) {
        warn!(target: "tzshift", "{warning}");
    }
}

/// Sink that stores warnings for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    warnings: RefCell<Vec<Warning>>,
}

impl RecordingSink {
    /// Returns the warnings received so far, oldest first.
    #[must_use]
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings.borrow().clone()
    }

    /// Returns the rendered warning messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.warnings.borrow().iter().map(ToString::to_string).collect()
    }
}

impl WarningSink for RecordingSink {
    fn warn(&self, warning: &Warning) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}
