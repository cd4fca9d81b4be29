//! Typed per-test overrides for the two shipped dimensions.
//!
//! A test unit, group, or module declares its override by building a
//! [`ScopeOverride`] and adding it to the unit's [`tzshift_common::ScopeChain`]:
//!
//! ```
//! use tzshift::TzShiftMarker;
//! use tzshift_common::{ScopeChain, ScopeOverride};
//!
//! let chain = ScopeChain::new()
//!     .with(ScopeOverride::function().timezones(["Asia/Tokyo", "SYSTEM"]))
//!     .with(ScopeOverride::module().locales(["C"]));
//! assert!(!chain.is_empty());
//! ```

use tzshift_common::ScopeOverride;

use crate::settings::{LOCALE, TIMEZONE};

/// Builder methods naming the time-zone and locale dimensions.
pub trait TzShiftMarker: Sized {
    /// Replaces the time-zone list at this scope.
    #[must_use]
    fn timezones<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;

    /// Replaces the locale list at this scope.
    #[must_use]
    fn locales<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>;
}

impl TzShiftMarker for ScopeOverride {
    fn timezones<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_values(TIMEZONE, values)
    }

    fn locales<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_values(LOCALE, values)
    }
}
