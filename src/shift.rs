//! The value handed to each running test unit.

use std::fmt;

use tzshift_common::RunContext;

use crate::settings::{LOCALE, TIMEZONE};

/// Active time zone and locale for one run.
///
/// Sentinel dimensions report the host value captured when the run began,
/// so a unit always sees a concrete zone and locale.
#[derive(Clone, Copy, Debug)]
pub struct TzShift<'a> {
    context: &'a RunContext,
}

impl<'a> TzShift<'a> {
    /// Wraps a live run context.
    #[must_use]
    pub const fn new(context: &'a RunContext) -> Self {
        Self { context }
    }

    /// Active time zone.
    #[must_use]
    pub fn timezone(&self) -> &'a str {
        self.context.value(TIMEZONE).unwrap_or_default()
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> &'a str {
        self.context.value(LOCALE).unwrap_or_default()
    }

    /// `(timezone, locale)`.
    #[must_use]
    pub fn as_tuple(&self) -> (&'a str, &'a str) {
        (self.timezone(), self.locale())
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.context.len()
    }

    /// Whether the run spans no dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }

    /// Active value by position: `0` is the time zone, `1` the locale.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&'a str> {
        self.context.get(position)
    }

    /// Combination index within the unit.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.context.index()
    }

    /// Display identifier, e.g. `3|Asia/Tokyo|C`.
    #[must_use]
    pub fn id(&self) -> &'a str {
        self.context.id()
    }

    /// The underlying run context.
    #[must_use]
    pub const fn context(&self) -> &'a RunContext {
        self.context
    }
}

impl<'a> IntoIterator for TzShift<'a> {
    type Item = &'a str;
    type IntoIter = std::vec::IntoIter<&'a str>;

    /// Yields the active values in dimension order, time zone first.
    fn into_iter(self) -> Self::IntoIter {
        self.context.values().into_iter()
    }
}

impl fmt::Display for TzShift<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "TzShift(tz={}, locale={})",
            self.timezone(),
            self.locale()
        )
    }
}
