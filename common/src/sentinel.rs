//! Recognition of the "leave the host value untouched" marker.
//!
//! Every dimension reserves a sentinel literal (by default `SYSTEM`). A raw
//! candidate matching it, ignoring case and surrounding whitespace, or an empty
//! candidate, means "keep whatever the host currently uses". Any other string
//! is a concrete value and passes through unchanged.

use std::fmt;

/// Default sentinel literal shared by the bundled dimensions.
pub const SENTINEL: &str = "SYSTEM";

/// Abbreviated label used when a sentinel value appears in identifiers.
pub const SENTINEL_LABEL: &str = "sys";

/// A candidate value after sentinel resolution.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum DimensionValue {
    /// Use the host's current setting for the dimension.
    Current,
    /// Apply this concrete value.
    Concrete(String),
}

impl DimensionValue {
    /// Returns the concrete value, or `None` for [`DimensionValue::Current`].
    #[must_use]
    pub fn concrete(&self) -> Option<&str> {
        match self {
            Self::Current => None,
            Self::Concrete(value) => Some(value.as_str()),
        }
    }

    /// Whether the value defers to the host setting.
    #[must_use]
    pub const fn is_current(&self) -> bool {
        matches!(self, Self::Current)
    }

    /// Label used in display identifiers; sentinels render as [`SENTINEL_LABEL`].
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Current => SENTINEL_LABEL,
            Self::Concrete(value) => value.as_str(),
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Returns `true` when `raw` denotes `sentinel`.
///
/// # Examples
///
/// ```
/// use tzshift_common::sentinel::is_sentinel;
///
/// assert!(is_sentinel(" system ", "SYSTEM"));
/// assert!(is_sentinel("", "SYSTEM"));
/// assert!(!is_sentinel("sys", "SYSTEM"));
/// ```
#[must_use]
pub fn is_sentinel(raw: &str, sentinel: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(sentinel.trim())
}

/// Resolves `raw` against the default [`SENTINEL`].
#[must_use]
pub fn resolve_sentinel(raw: &str) -> DimensionValue {
    resolve_sentinel_with(raw, SENTINEL)
}

/// Resolves `raw` against a dimension-specific sentinel literal.
///
/// Unmatched strings are returned verbatim, including any surrounding
/// whitespace the caller chose to keep.
#[must_use]
pub fn resolve_sentinel_with(raw: &str, sentinel: &str) -> DimensionValue {
    if is_sentinel(raw, sentinel) {
        DimensionValue::Current
    } else {
        DimensionValue::Concrete(raw.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("SYSTEM")]
    #[case("system")]
    #[case("SyStEm")]
    #[case(" system ")]
    #[case("\tSystem  ")]
    #[case("")]
    #[case("   ")]
    fn recognises_sentinel_spellings(#[case] raw: &str) {
        assert_eq!(resolve_sentinel(raw), DimensionValue::Current);
    }

    #[rstest]
    #[case("UTC")]
    #[case("sys")]
    #[case("SYSTEMS")]
    #[case("en_US.UTF-8")]
    fn passes_other_values_through(#[case] raw: &str) {
        assert_eq!(
            resolve_sentinel(raw),
            DimensionValue::Concrete(raw.to_owned())
        );
    }

    #[rstest]
    fn honours_custom_sentinels() {
        assert!(resolve_sentinel_with("host", "HOST").is_current());
        assert!(!resolve_sentinel_with("system", "HOST").is_current());
    }

    #[rstest]
    fn labels_abbreviate_the_sentinel() {
        assert_eq!(DimensionValue::Current.label(), "sys");
        assert_eq!(DimensionValue::Concrete("UTC".to_owned()).label(), "UTC");
        assert_eq!(DimensionValue::Current.concrete(), None);
    }
}
