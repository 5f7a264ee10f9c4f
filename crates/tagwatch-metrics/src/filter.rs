//! # Record Filtering
//!
//! Multi-select filters over the grouping dimensions. An empty selection
//! for a dimension means "all values"; a non-empty selection keeps only
//! records whose value is in the set. Selections across dimensions combine
//! with AND.

use std::collections::{BTreeMap, BTreeSet};

use tagwatch_core::{Dimension, ResourceRecord};

/// Per-dimension value selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    selections: BTreeMap<Dimension, BTreeSet<String>>,
}

impl RecordFilter {
    /// A filter that keeps every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Add accepted values for `dimension`. Blank values are ignored.
    pub fn select<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.into().trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();
        if !values.is_empty() {
            self.selections.entry(dimension).or_default().extend(values);
        }
        self
    }

    /// Whether no dimension is restricted.
    pub fn is_unrestricted(&self) -> bool {
        self.selections.is_empty()
    }

    /// Accepted values for `dimension`; `None` means all values.
    pub fn selection(&self, dimension: Dimension) -> Option<&BTreeSet<String>> {
        self.selections.get(&dimension)
    }

    /// Whether `record` passes every selection.
    pub fn matches(&self, record: &ResourceRecord) -> bool {
        self.selections
            .iter()
            .all(|(dimension, accepted)| accepted.contains(record.dimension(*dimension)))
    }

    /// The matching subset of `records`, in input order.
    pub fn apply(&self, records: &[ResourceRecord]) -> Vec<ResourceRecord> {
        let kept: Vec<ResourceRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        tracing::debug!(input = records.len(), kept = kept.len(), "applied record filter");
        kept
    }
}

/// Distinct values present for `dimension`, sorted. Feeds filter choices.
pub fn distinct_values(records: &[ResourceRecord], dimension: Dimension) -> Vec<String> {
    records
        .iter()
        .map(|r| r.dimension(dimension).to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
