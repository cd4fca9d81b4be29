//! The read-only view of a live combination handed to the running unit.

use crate::host::Snapshot;
use crate::sentinel::DimensionValue;

/// One dimension's state inside an active session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveValue {
    dimension: String,
    requested: DimensionValue,
    original: Snapshot,
    active: String,
}

impl ActiveValue {
    pub(crate) fn new(dimension: &str, requested: DimensionValue, original: Snapshot) -> Self {
        let active = match &requested {
            DimensionValue::Current => original.label().to_owned(),
            DimensionValue::Concrete(value) => value.clone(),
        };
        Self {
            dimension: dimension.to_owned(),
            requested,
            original,
            active,
        }
    }

    /// Dimension name.
    #[must_use]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Value the combination asked for, before sentinel substitution.
    #[must_use]
    pub const fn requested(&self) -> &DimensionValue {
        &self.requested
    }

    /// Host setting captured when the session opened.
    #[must_use]
    pub const fn original(&self) -> &Snapshot {
        &self.original
    }

    /// Value in force while the unit runs.
    #[must_use]
    pub fn active(&self) -> &str {
        &self.active
    }
}

/// Immutable snapshot of a running combination.
///
/// Values are readable by position (`get(0)`, `get(1)`), by dimension name,
/// or all at once in dimension order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunContext {
    index: usize,
    id: String,
    entries: Vec<ActiveValue>,
}

impl RunContext {
    pub(crate) const fn new(index: usize, id: String, entries: Vec<ActiveValue>) -> Self {
        Self { index, id, entries }
    }

    /// Index of the combination within its unit.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Display identifier of the combination.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Number of dimensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context spans no dimensions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Active value at dimension position `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(ActiveValue::active)
    }

    /// Active value for the named dimension.
    #[must_use]
    pub fn value(&self, dimension: &str) -> Option<&str> {
        self.entry(dimension).map(ActiveValue::active)
    }

    /// Full state for the named dimension.
    #[must_use]
    pub fn entry(&self, dimension: &str) -> Option<&ActiveValue> {
        self.entries
            .iter()
            .find(|entry| entry.dimension() == dimension)
    }

    /// Active values in dimension order.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.entries.iter().map(ActiveValue::active).collect()
    }

    /// Iterates every dimension's state in order.
    pub fn entries(&self) -> impl Iterator<Item = &ActiveValue> {
        self.entries.iter()
    }
}
