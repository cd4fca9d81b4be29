//! Scope-level overrides and their precedence resolution.
//!
//! A test unit sits inside a chain of scopes: the function itself, any
//! enclosing groups, the module or collection, and finally a global scope.
//! Each scope may replace the value list of any dimension and may disable
//! parametrisation entirely. Resolution walks the chain from the most specific
//! scope outwards:
//!
//! 1. The first scope that sets `disable` wins and stops resolution.
//! 2. Otherwise each dimension independently takes the list from the first
//!    scope that names it.
//! 3. Dimensions no scope names fall back to the configured defaults.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::dimension::Dimension;
use crate::error::ConfigError;

/// Nesting level at which an override is declared.
///
/// Ordering follows specificity: `Function < Group < Module < Global`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScopeLevel {
    /// The test function itself.
    Function,
    /// A class, `mod tests` block, or other grouping of test functions.
    Group,
    /// A module, file, or whole collection.
    Module,
    /// Suite-wide overrides declared alongside the defaults.
    Global,
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => formatter.write_str("function"),
            Self::Group => formatter.write_str("group"),
            Self::Module => formatter.write_str("module"),
            Self::Global => formatter.write_str("global"),
        }
    }
}

/// Override data attached to a single scope.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScopeOverride {
    level: ScopeLevel,
    values: BTreeMap<String, Vec<String>>,
    disable: bool,
}

impl ScopeOverride {
    /// Starts an empty override at `level`.
    #[must_use]
    pub const fn new(level: ScopeLevel) -> Self {
        Self {
            level,
            values: BTreeMap::new(),
            disable: false,
        }
    }

    /// Starts an empty function-level override.
    #[must_use]
    pub const fn function() -> Self {
        Self::new(ScopeLevel::Function)
    }

    /// Starts an empty group-level override.
    #[must_use]
    pub const fn group() -> Self {
        Self::new(ScopeLevel::Group)
    }

    /// Starts an empty module-level override.
    #[must_use]
    pub const fn module() -> Self {
        Self::new(ScopeLevel::Module)
    }

    /// Replaces the value list for `dimension` at this scope.
    ///
    /// # Examples
    ///
    /// ```
    /// use tzshift_common::scope::ScopeOverride;
    ///
    /// let marker = ScopeOverride::function().with_values("timezone", ["UTC"]);
    /// assert_eq!(marker.values_for("timezone"), Some(&["UTC".to_owned()][..]));
    /// assert_eq!(marker.values_for("locale"), None);
    /// ```
    #[must_use]
    pub fn with_values<I, S>(mut self, dimension: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.insert(
            dimension.into(),
            values.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Disables parametrisation for every unit under this scope.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.disable = true;
        self
    }

    /// Returns the nesting level.
    #[must_use]
    pub const fn level(&self) -> ScopeLevel {
        self.level
    }

    /// Whether this scope disables parametrisation.
    #[must_use]
    pub const fn disables(&self) -> bool {
        self.disable
    }

    /// Returns the override list for `dimension`, when this scope sets one.
    #[must_use]
    pub fn values_for(&self, dimension: &str) -> Option<&[String]> {
        self.values.get(dimension).map(Vec::as_slice)
    }

    /// Names of the dimensions this scope overrides.
    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// The ordered chain of scopes that applies to one test unit.
///
/// Scopes are kept sorted from most to least specific regardless of the
/// order they were pushed in; scopes at the same level keep push order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScopeChain {
    scopes: Vec<ScopeOverride>,
}

impl ScopeChain {
    /// Creates an empty chain (no overrides anywhere).
    #[must_use]
    pub const fn new() -> Self {
        Self { scopes: Vec::new() }
    }

    /// Adds a scope to the chain.
    #[must_use]
    pub fn with(mut self, scope: ScopeOverride) -> Self {
        self.push(scope);
        self
    }

    /// Adds a scope to the chain in place.
    pub fn push(&mut self, scope: ScopeOverride) {
        let position = self
            .scopes
            .iter()
            .position(|existing| existing.level() > scope.level())
            .unwrap_or(self.scopes.len());
        self.scopes.insert(position, scope);
    }

    /// Iterates the chain from the most specific scope outwards.
    pub fn iter(&self) -> impl Iterator<Item = &ScopeOverride> {
        self.scopes.iter()
    }

    /// Whether the chain carries no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl FromIterator<ScopeOverride> for ScopeChain {
    fn from_iter<T: IntoIterator<Item = ScopeOverride>>(iter: T) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Where a resolved value list came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueSource {
    /// An override declared at the given scope.
    Scope(ScopeLevel),
    /// The merged global defaults (configuration file and CLI).
    Default,
}

impl fmt::Display for ValueSource {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scope(level) => write!(formatter, "{level} override"),
            Self::Default => formatter.write_str("configured defaults"),
        }
    }
}

/// What switched parametrisation off for a unit.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DisableSource {
    /// The session-wide switch (`--no-tzshift`).
    Global,
    /// A scope override with `disable` set.
    Scope(ScopeLevel),
}

/// A dimension with the value list chosen for one test unit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResolvedDimension {
    dimension: Dimension,
    source: ValueSource,
}

impl ResolvedDimension {
    /// Pairs a dimension (carrying its resolved values) with its provenance.
    #[must_use]
    pub const fn new(dimension: Dimension, source: ValueSource) -> Self {
        Self { dimension, source }
    }

    /// Returns the dimension with its resolved values.
    #[must_use]
    pub const fn dimension(&self) -> &Dimension {
        &self.dimension
    }

    /// Returns the dimension name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.dimension.name()
    }

    /// Returns the resolved raw values.
    #[must_use]
    pub fn values(&self) -> &[String] {
        self.dimension.values()
    }

    /// Returns where the values came from.
    #[must_use]
    pub const fn source(&self) -> ValueSource {
        self.source
    }
}

/// Outcome of resolving a unit's scope chain.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// Parametrisation is disabled; the unit runs once against host values.
    Disabled(DisableSource),
    /// Per-dimension value lists, in configured dimension order.
    Enabled(Vec<ResolvedDimension>),
}

impl Resolution {
    /// Whether parametrisation was disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled(_))
    }
}

/// Resolves the effective value lists and disable flag for one test unit.
///
/// `defaults` fixes the dimension order and supplies the fallback lists.
/// `disable_all` mirrors the session-wide switch and short-circuits exactly
/// like a unit-level disable.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownDimension`] when a scope overrides a
/// dimension absent from `defaults`, and [`ConfigError::DuplicateDimension`]
/// when `defaults` repeats a name.
///
/// # Examples
///
/// ```
/// use tzshift_common::dimension::Dimension;
/// use tzshift_common::scope::{Resolution, ScopeChain, ScopeOverride, resolve_overrides};
///
/// let defaults = [
///     Dimension::new("timezone", ["UTC", "Asia/Tokyo"]),
///     Dimension::new("locale", ["C"]),
/// ];
/// let chain = ScopeChain::new()
///     .with(ScopeOverride::function().with_values("timezone", ["Europe/Paris"]))
///     .with(ScopeOverride::module().with_values("locale", ["en_US.UTF-8"]));
///
/// let Resolution::Enabled(resolved) = resolve_overrides(&chain, &defaults, false)? else {
///     panic!("expected an enabled resolution");
/// };
/// assert_eq!(resolved[0].values(), ["Europe/Paris"]);
/// assert_eq!(resolved[1].values(), ["en_US.UTF-8"]);
/// # Ok::<(), tzshift_common::ConfigError>(())
/// ```
pub fn resolve_overrides(
    chain: &ScopeChain,
    defaults: &[Dimension],
    disable_all: bool,
) -> Result<Resolution, ConfigError> {
    check_dimension_names(chain, defaults)?;

    if disable_all {
        debug!(target: "tzshift::scope", "parametrisation disabled session-wide");
        return Ok(Resolution::Disabled(DisableSource::Global));
    }

    if let Some(scope) = chain.iter().find(|scope| scope.disables()) {
        debug!(
            target: "tzshift::scope",
            "parametrisation disabled by {} override",
            scope.level(),
        );
        return Ok(Resolution::Disabled(DisableSource::Scope(scope.level())));
    }

    let resolved = defaults
        .iter()
        .map(|default| resolve_dimension(chain, default))
        .collect();

    Ok(Resolution::Enabled(resolved))
}

fn resolve_dimension(chain: &ScopeChain, default: &Dimension) -> ResolvedDimension {
    let found = chain.iter().find_map(|scope| {
        scope
            .values_for(default.name())
            .map(|values| (scope.level(), values))
    });

    let resolved = match found {
        Some((level, values)) => ResolvedDimension::new(
            Dimension::new(default.name(), values.iter().cloned())
                .with_sentinel(default.sentinel()),
            ValueSource::Scope(level),
        ),
        None => ResolvedDimension::new(default.clone(), ValueSource::Default),
    };

    debug!(
        target: "tzshift::scope",
        "resolved {} from {}: {:?}",
        resolved.name(),
        resolved.source(),
        resolved.values(),
    );

    resolved
}

fn check_dimension_names(chain: &ScopeChain, defaults: &[Dimension]) -> Result<(), ConfigError> {
    for (position, dimension) in defaults.iter().enumerate() {
        let repeated = defaults
            .iter()
            .take(position)
            .any(|earlier| earlier.name() == dimension.name());
        if repeated {
            return Err(ConfigError::DuplicateDimension {
                dimension: dimension.name().to_owned(),
            });
        }
    }

    let unknown = chain
        .iter()
        .flat_map(ScopeOverride::dimensions)
        .find(|name| !defaults.iter().any(|dimension| dimension.name() == *name));

    match unknown {
        Some(name) => Err(ConfigError::UnknownDimension {
            dimension: name.to_owned(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn defaults() -> Vec<Dimension> {
        vec![
            Dimension::new("timezone", ["UTC", "America/New_York"]),
            Dimension::new("locale", ["C", "en_US.UTF-8"]),
        ]
    }

    fn enabled(resolution: Resolution) -> Vec<ResolvedDimension> {
        match resolution {
            Resolution::Enabled(resolved) => resolved,
            Resolution::Disabled(source) => panic!("unexpected disable from {source:?}"),
        }
    }

    #[rstest]
    fn empty_chain_uses_defaults(defaults: Vec<Dimension>) {
        let resolved = enabled(
            resolve_overrides(&ScopeChain::new(), &defaults, false).expect("resolution"),
        );

        assert_eq!(resolved.len(), 2);
        assert!(
            resolved
                .iter()
                .all(|dimension| dimension.source() == ValueSource::Default)
        );
        assert_eq!(resolved[0].values(), ["UTC", "America/New_York"]);
    }

    #[rstest]
    fn dimensions_resolve_independently(defaults: Vec<Dimension>) {
        let chain = ScopeChain::new()
            .with(ScopeOverride::module().with_values("locale", ["de_DE.UTF-8"]))
            .with(ScopeOverride::function().with_values("timezone", ["Asia/Tokyo"]));

        let resolved = enabled(resolve_overrides(&chain, &defaults, false).expect("resolution"));

        assert_eq!(resolved[0].values(), ["Asia/Tokyo"]);
        assert_eq!(
            resolved[0].source(),
            ValueSource::Scope(ScopeLevel::Function)
        );
        assert_eq!(resolved[1].values(), ["de_DE.UTF-8"]);
        assert_eq!(resolved[1].source(), ValueSource::Scope(ScopeLevel::Module));
    }

    #[rstest]
    fn innermost_scope_wins_per_dimension(defaults: Vec<Dimension>) {
        let chain: ScopeChain = [
            ScopeOverride::module().with_values("timezone", ["Europe/London"]),
            ScopeOverride::group().with_values("timezone", ["Asia/Kolkata"]),
            ScopeOverride::function().with_values("timezone", ["UTC"]),
        ]
        .into_iter()
        .collect();

        let resolved = enabled(resolve_overrides(&chain, &defaults, false).expect("resolution"));

        assert_eq!(resolved[0].values(), ["UTC"]);
    }

    #[rstest]
    #[case::function(ScopeLevel::Function)]
    #[case::group(ScopeLevel::Group)]
    #[case::module(ScopeLevel::Module)]
    fn disable_short_circuits_at_any_level(defaults: Vec<Dimension>, #[case] level: ScopeLevel) {
        let chain = ScopeChain::new()
            .with(ScopeOverride::function().with_values("timezone", ["UTC"]))
            .with(ScopeOverride::new(level).disabled());

        let resolution = resolve_overrides(&chain, &defaults, false).expect("resolution");

        assert_eq!(
            resolution,
            Resolution::Disabled(DisableSource::Scope(level))
        );
    }

    #[rstest]
    fn session_switch_disables_everything(defaults: Vec<Dimension>) {
        let chain =
            ScopeChain::new().with(ScopeOverride::function().with_values("timezone", ["UTC"]));

        let resolution = resolve_overrides(&chain, &defaults, true).expect("resolution");

        assert_eq!(resolution, Resolution::Disabled(DisableSource::Global));
    }

    #[rstest]
    fn rejects_unknown_dimensions(defaults: Vec<Dimension>) {
        let chain =
            ScopeChain::new().with(ScopeOverride::group().with_values("currency", ["EUR"]));

        let err = resolve_overrides(&chain, &defaults, false).expect_err("unknown dimension");

        assert_eq!(
            err,
            ConfigError::UnknownDimension {
                dimension: "currency".to_owned()
            }
        );
    }

    #[rstest]
    fn rejects_duplicate_defaults() {
        let defaults = [Dimension::new("locale", ["C"]), Dimension::new("locale", ["C"])];

        let err =
            resolve_overrides(&ScopeChain::new(), &defaults, false).expect_err("duplicate");

        assert!(matches!(err, ConfigError::DuplicateDimension { .. }));
    }

    #[rstest]
    fn overrides_keep_the_default_sentinel() {
        let defaults = [Dimension::new("timezone", ["UTC"]).with_sentinel("HOST")];
        let chain =
            ScopeChain::new().with(ScopeOverride::function().with_values("timezone", ["host"]));

        let resolved = enabled(resolve_overrides(&chain, &defaults, false).expect("resolution"));

        assert_eq!(resolved[0].dimension().sentinel(), "HOST");
    }

    #[rstest]
    fn chain_orders_scopes_by_specificity() {
        let chain: ScopeChain = [
            ScopeOverride::module(),
            ScopeOverride::function(),
            ScopeOverride::new(ScopeLevel::Global),
            ScopeOverride::group(),
        ]
        .into_iter()
        .collect();

        let levels: Vec<ScopeLevel> = chain.iter().map(ScopeOverride::level).collect();

        assert_eq!(
            levels,
            [
                ScopeLevel::Function,
                ScopeLevel::Group,
                ScopeLevel::Module,
                ScopeLevel::Global
            ]
        );
    }
}
