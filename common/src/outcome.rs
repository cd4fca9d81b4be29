//! Per-combination run outcomes.

use std::fmt;

/// Why a combination did not execute.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SkipReason {
    dimension: String,
    value: String,
    detail: String,
}

impl SkipReason {
    /// Builds a skip reason for `value` of `dimension`.
    #[must_use]
    pub fn new(
        dimension: impl Into<String>,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            dimension: dimension.into(),
            value: value.into(),
            detail: detail.into(),
        }
    }

    /// Dimension whose value could not be honoured.
    #[must_use]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// The offending value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Host or probe explanation.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} unavailable: `{}` ({})",
            self.dimension, self.value, self.detail,
        )
    }
}

/// What happened to one combination.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RunOutcome<T> {
    /// The unit ran and produced `T` (which may itself encode pass or fail).
    Executed(T),
    /// The unit did not run.
    Skipped(SkipReason),
}

impl<T> RunOutcome<T> {
    /// Whether the unit ran.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed(_))
    }

    /// Returns the skip reason, if the unit was skipped.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Executed(_) => None,
            Self::Skipped(reason) => Some(reason),
        }
    }

    /// Converts into the unit's output, discarding skip details.
    #[must_use]
    pub fn executed(self) -> Option<T> {
        match self {
            Self::Executed(output) => Some(output),
            Self::Skipped(_) => None,
        }
    }
}
