//! The per-unit combination cap.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Upper bound on the number of combinations generated for one test unit.
///
/// Zero means unlimited.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Cap(usize);

impl Cap {
    /// No limit on the number of combinations.
    pub const UNLIMITED: Self = Self(0);

    /// Builds a cap from a raw count; `0` means unlimited.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self(limit)
    }

    /// Returns the limit, or `None` when unlimited.
    #[must_use]
    pub const fn limit(self) -> Option<usize> {
        if self.0 == 0 { None } else { Some(self.0) }
    }

    /// Whether a product of `total` combinations exceeds the cap.
    #[must_use]
    pub const fn truncates(self, total: usize) -> bool {
        self.0 != 0 && total > self.0
    }
}

impl TryFrom<i64> for Cap {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .map(Self)
            .map_err(|_| ConfigError::NegativeCap { value })
    }
}

impl FromStr for Cap {
    type Err = ConfigError;

    /// Parses a cap, rejecting non-integers and negative values.
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift_common::cap::Cap;
    ///
    /// assert_eq!("3".parse::<Cap>()?.limit(), Some(3));
    /// assert_eq!(" 0 ".parse::<Cap>()?.limit(), None);
    /// assert!("-1".parse::<Cap>().is_err());
    /// # Ok::<(), tzshift_common::ConfigError>(())
    /// ```
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidCap {
                raw: raw.to_owned(),
            })?;
        Self::try_from(value)
    }
}

impl fmt::Display for Cap {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.limit() {
            Some(limit) => write!(formatter, "{limit}"),
            None => formatter.write_str("unlimited"),
        }
    }
}
