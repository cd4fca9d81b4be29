//! Cartesian-product generation of value combinations.
//!
//! Combinations are produced in nested-loop order: the first dimension varies
//! slowest and values keep their configured order within each dimension. The
//! resulting index is part of every display identifier, so this order is a
//! stability guarantee rather than an implementation detail.

use std::fmt;

use log::debug;

use crate::cap::Cap;
use crate::dimension::dedup_preserving_order;
use crate::error::ConfigError;
use crate::scope::{Resolution, ResolvedDimension};
use crate::sentinel::DimensionValue;

/// One resolved value per dimension plus a stable index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Combination {
    index: usize,
    id: String,
    entries: Vec<(String, DimensionValue)>,
}

impl Combination {
    fn new(index: usize, width: usize, entries: Vec<(String, DimensionValue)>) -> Self {
        let mut id = format!("{index:>width$}");
        for (_, value) in &entries {
            id.push('|');
            id.push_str(value.label());
        }
        Self { index, id, entries }
    }

    /// Zero-based position within the unit's generated list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Display identifier in the form `index|value1|value2`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of dimensions in the combination.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the combination spans no dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value at dimension position `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&DimensionValue> {
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Returns the value for the named dimension.
    #[must_use]
    pub fn value(&self, dimension: &str) -> Option<&DimensionValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == dimension)
            .map(|(_, value)| value)
    }

    /// Iterates `(dimension, value)` pairs in dimension order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &DimensionValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.id)
    }
}

/// Record of a cap dropping combinations from a unit's product.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Truncation {
    /// Number of combinations kept.
    pub kept: usize,
    /// Size of the full product.
    pub total: usize,
}

/// The ordered list of combinations generated for one test unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CombinationPlan {
    combinations: Vec<Combination>,
    truncation: Option<Truncation>,
    disabled: bool,
}

impl CombinationPlan {
    /// A single combination leaving every named dimension at its host value.
    #[must_use]
    pub fn disabled<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = dimensions
            .into_iter()
            .map(|name| (name.into(), DimensionValue::Current))
            .collect();
        Self {
            combinations: vec![Combination::new(0, 1, entries)],
            truncation: None,
            disabled: true,
        }
    }

    /// Returns the generated combinations in order.
    #[must_use]
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    /// Number of combinations that will run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combinations.len()
    }

    /// Whether the plan holds no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combinations.is_empty()
    }

    /// Returns the truncation record when the cap dropped combinations.
    #[must_use]
    pub const fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    /// Whether parametrisation was disabled for the unit.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Display identifiers in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.combinations.iter().map(Combination::id)
    }
}

impl<'a> IntoIterator for &'a CombinationPlan {
    type Item = &'a Combination;
    type IntoIter = std::slice::Iter<'a, Combination>;

    fn into_iter(self) -> Self::IntoIter {
        self.combinations.iter()
    }
}

/// Builds the plan for a resolved unit, honouring a disable outcome.
///
/// `dimension_names` is only consulted for disabled resolutions, where it
/// names the all-sentinel combination's dimensions.
///
/// # Errors
///
/// Propagates [`generate`] failures for enabled resolutions.
pub fn plan(
    resolution: &Resolution,
    dimension_names: &[&str],
    cap: Cap,
) -> Result<CombinationPlan, ConfigError> {
    match resolution {
        Resolution::Disabled(_) => Ok(CombinationPlan::disabled(dimension_names.iter().copied())),
        Resolution::Enabled(resolved) => generate(resolved, cap),
    }
}

/// Generates the ordered Cartesian product of `resolved`, applying `cap`.
///
/// Each dimension's values are sentinel-normalised and deduplicated first,
/// so `SYSTEM` and `system` collapse into a single "use current" entry.
///
/// # Errors
///
/// Returns [`ConfigError::EmptyDimension`] when any dimension has no values.
///
/// # Examples
///
/// ```
/// use tzshift_common::cap::Cap;
/// use tzshift_common::combination::generate;
/// use tzshift_common::dimension::Dimension;
/// use tzshift_common::scope::{ResolvedDimension, ValueSource};
///
/// let resolved = [
///     ResolvedDimension::new(Dimension::new("timezone", ["UTC", "SYSTEM"]), ValueSource::Default),
///     ResolvedDimension::new(Dimension::new("locale", ["C"]), ValueSource::Default),
/// ];
/// let plan = generate(&resolved, Cap::UNLIMITED)?;
/// let ids: Vec<&str> = plan.ids().collect();
/// assert_eq!(ids, ["0|UTC|C", "1|sys|C"]);
/// # Ok::<(), tzshift_common::ConfigError>(())
/// ```
pub fn generate(resolved: &[ResolvedDimension], cap: Cap) -> Result<CombinationPlan, ConfigError> {
    let lists = resolved
        .iter()
        .map(normalised_values)
        .collect::<Result<Vec<_>, _>>()?;

    let total = lists
        .iter()
        .fold(1_usize, |product, list| product.saturating_mul(list.len()));
    let kept = cap.limit().map_or(total, |limit| total.min(limit));
    let width = kept.saturating_sub(1).to_string().len();

    let combinations = (0..kept)
        .map(|index| {
            let entries = resolved
                .iter()
                .map(|dimension| dimension.name().to_owned())
                .zip(tuple_at(&lists, index))
                .collect();
            Combination::new(index, width, entries)
        })
        .collect();

    let truncation = cap
        .truncates(total)
        .then_some(Truncation { kept, total });

    debug!(
        target: "tzshift::combination",
        "generated {kept} of {total} combinations (cap {cap})",
    );

    Ok(CombinationPlan {
        combinations,
        truncation,
        disabled: false,
    })
}

fn normalised_values(resolved: &ResolvedDimension) -> Result<Vec<DimensionValue>, ConfigError> {
    let dimension = resolved.dimension();
    let values = dedup_preserving_order(
        dimension
            .values()
            .iter()
            .map(|raw| dimension.resolve(raw)),
    );

    if values.is_empty() {
        return Err(ConfigError::EmptyDimension {
            dimension: dimension.name().to_owned(),
        });
    }

    Ok(values)
}

/// Decodes `index` as a mixed-radix number whose last digit varies fastest.
fn tuple_at(lists: &[Vec<DimensionValue>], index: usize) -> Vec<DimensionValue> {
    let mut remaining = index;
    let mut tuple: Vec<DimensionValue> = lists
        .iter()
        .rev()
        .filter_map(|list| {
            let digit = remaining % list.len();
            remaining /= list.len();
            list.get(digit).cloned()
        })
        .collect();
    tuple.reverse();
    tuple
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Dimension;
    use crate::scope::{DisableSource, ValueSource};
    use rstest::{fixture, rstest};

    fn resolved(name: &str, values: &[&str]) -> ResolvedDimension {
        ResolvedDimension::new(
            Dimension::new(name, values.iter().copied()),
            ValueSource::Default,
        )
    }

    #[fixture]
    fn matrix() -> Vec<ResolvedDimension> {
        vec![
            resolved("timezone", &["UTC", "America/New_York"]),
            resolved("locale", &["C", "en_US.UTF-8"]),
        ]
    }

    #[rstest]
    fn first_dimension_varies_slowest(matrix: Vec<ResolvedDimension>) {
        let plan = generate(&matrix, Cap::UNLIMITED).expect("plan");

        let ids: Vec<&str> = plan.ids().collect();
        assert_eq!(
            ids,
            [
                "0|UTC|C",
                "1|UTC|en_US.UTF-8",
                "2|America/New_York|C",
                "3|America/New_York|en_US.UTF-8",
            ]
        );
        assert!(plan.truncation().is_none());
    }

    #[rstest]
    fn cap_keeps_the_leading_combinations(matrix: Vec<ResolvedDimension>) {
        let plan = generate(&matrix, Cap::new(2)).expect("plan");

        let ids: Vec<&str> = plan.ids().collect();
        assert_eq!(ids, ["0|UTC|C", "1|UTC|en_US.UTF-8"]);
        assert_eq!(plan.truncation(), Some(Truncation { kept: 2, total: 4 }));
    }

    #[rstest]
    fn cap_at_product_size_does_not_truncate(matrix: Vec<ResolvedDimension>) {
        let plan = generate(&matrix, Cap::new(4)).expect("plan");

        assert_eq!(plan.len(), 4);
        assert!(plan.truncation().is_none());
    }

    #[rstest]
    #[case(1, 1)]
    #[case(3, 4)]
    #[case(4, 3)]
    #[case(5, 5)]
    fn product_size_matches(#[case] m: usize, #[case] n: usize) {
        let first: Vec<String> = (0..m).map(|value| format!("tz{value}")).collect();
        let second: Vec<String> = (0..n).map(|value| format!("loc{value}")).collect();
        let dims = [
            ResolvedDimension::new(Dimension::new("timezone", first), ValueSource::Default),
            ResolvedDimension::new(Dimension::new("locale", second), ValueSource::Default),
        ];

        let plan = generate(&dims, Cap::UNLIMITED).expect("plan");

        assert_eq!(plan.len(), m * n);
        for (position, combination) in plan.combinations().iter().enumerate() {
            assert_eq!(combination.index(), position);
            let expected_tz = format!("tz{}", position / n);
            let expected_loc = format!("loc{}", position % n);
            assert_eq!(
                combination.get(0),
                Some(&DimensionValue::Concrete(expected_tz))
            );
            assert_eq!(
                combination.get(1),
                Some(&DimensionValue::Concrete(expected_loc))
            );
        }
    }

    #[rstest]
    fn index_is_padded_to_the_widest_index() {
        let timezones: Vec<String> = (0..11).map(|value| format!("Z{value}")).collect();
        let dims = [
            ResolvedDimension::new(Dimension::new("timezone", timezones), ValueSource::Default),
            resolved("locale", &["C"]),
        ];

        let plan = generate(&dims, Cap::UNLIMITED).expect("plan");

        let ids: Vec<&str> = plan.ids().collect();
        assert_eq!(ids.first().copied(), Some(" 0|Z0|C"));
        assert_eq!(ids.last().copied(), Some("10|Z10|C"));
    }

    #[rstest]
    fn sentinel_spellings_collapse() {
        let dims = [
            resolved("timezone", &["UTC", "SYSTEM", "UTC", "system"]),
            resolved("locale", &["C", "", "C"]),
        ];

        let plan = generate(&dims, Cap::UNLIMITED).expect("plan");

        let ids: Vec<&str> = plan.ids().collect();
        assert_eq!(ids, ["0|UTC|C", "1|UTC|sys", "2|sys|C", "3|sys|sys"]);
    }

    #[rstest]
    fn empty_dimension_is_a_configuration_error() {
        let dims = [resolved("timezone", &["UTC"]), resolved("locale", &[])];

        let err = generate(&dims, Cap::UNLIMITED).expect_err("empty locale list");

        assert_eq!(
            err,
            ConfigError::EmptyDimension {
                dimension: "locale".to_owned()
            }
        );
    }

    #[rstest]
    fn disabled_resolution_yields_one_current_combination() {
        let resolution = Resolution::Disabled(DisableSource::Global);

        let disabled = plan(&resolution, &["timezone", "locale"], Cap::new(1)).expect("plan");

        assert!(disabled.is_disabled());
        assert_eq!(disabled.len(), 1);
        let ids: Vec<&str> = disabled.ids().collect();
        assert_eq!(ids, ["0|sys|sys"]);
        assert!(
            disabled
                .combinations()
                .iter()
                .flat_map(Combination::entries)
                .all(|(_, value)| value.is_current())
        );
    }

    #[rstest]
    fn lookup_by_dimension_name(matrix: Vec<ResolvedDimension>) {
        let plan = generate(&matrix, Cap::UNLIMITED).expect("plan");
        let last = plan.combinations().last().expect("four combinations");

        assert_eq!(
            last.value("timezone").and_then(DimensionValue::concrete),
            Some("America/New_York")
        );
        assert_eq!(last.value("currency"), None);
    }
}
