//! Named axes of variation and their candidate values.

use crate::sentinel::{DimensionValue, SENTINEL, resolve_sentinel_with};

/// A named axis of variation with an ordered list of candidate values.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Dimension {
    name: String,
    values: Vec<String>,
    sentinel: String,
}

impl Dimension {
    /// Builds a dimension using the default [`SENTINEL`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift_common::dimension::Dimension;
    ///
    /// let dimension = Dimension::new("timezone", ["UTC", "Asia/Tokyo"]);
    /// assert_eq!(dimension.name(), "timezone");
    /// assert_eq!(dimension.values(), ["UTC", "Asia/Tokyo"]);
    /// ```
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            sentinel: SENTINEL.to_owned(),
        }
    }

    /// Replaces the sentinel literal for this dimension.
    #[must_use]
    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    /// Returns the dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the raw candidate values in configured order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Returns the sentinel literal.
    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// Resolves `raw` against this dimension's sentinel.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> DimensionValue {
        resolve_sentinel_with(raw, &self.sentinel)
    }
}

/// Drops repeated entries while keeping the first occurrence of each.
#[must_use]
pub fn dedup_preserving_order<T>(items: impl IntoIterator<Item = T>) -> Vec<T>
where
    T: PartialEq,
{
    let mut unique: Vec<T> = Vec::new();
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn resolves_with_the_dimension_sentinel() {
        let dimension = Dimension::new("locale", ["C"]).with_sentinel("HOST");
        assert!(dimension.resolve(" host ").is_current());
        assert!(!dimension.resolve("SYSTEM").is_current());
    }

    #[rstest]
    fn dedup_keeps_first_occurrence() {
        let unique = dedup_preserving_order(["C", "en_US", "C", "de_DE", "en_US"]);
        assert_eq!(unique, ["C", "en_US", "de_DE"]);
    }
}
