//! # Cost & Compliance Breakdowns
//!
//! Groups records by a [`Dimension`] or by the value of a tag and reports,
//! per group, resource counts, costs and compliance. Used for showback
//! (cost by department), service rankings, environment distribution, and
//! creation-method views (grouping by a `CreatedBy` tag).
//!
//! Groups partition the input: every record lands in exactly one group, so
//! group counts and costs always sum to the collection totals.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;
use tagwatch_core::{Dimension, RequiredTags, ResourceRecord, TagwatchError};

use crate::coverage::{TagCoverage, TagStatus};
use crate::report::{decimal_percentage, percentage, validate_costs};

/// Group label for records that lack the grouping tag.
pub const MISSING_GROUP: &str = "(missing)";

/// What to group records by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupBy {
    /// A record attribute.
    Dimension(Dimension),
    /// The value of a tag or pass-through column; blanks group as [`MISSING_GROUP`].
    Tag(String),
}

impl GroupBy {
    fn key_of<'r>(&self, record: &'r ResourceRecord) -> &'r str {
        match self {
            Self::Dimension(d) => record.dimension(*d),
            Self::Tag(key) => record.field_value(key).unwrap_or(MISSING_GROUP),
        }
    }

    /// Display label for the grouping.
    pub fn label(&self) -> &str {
        match self {
            Self::Dimension(d) => d.label(),
            Self::Tag(key) => key,
        }
    }
}

/// Cost-at-risk classification of a group, by unallocated share of its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// At most 25% of the group's cost is unallocated.
    Low,
    /// More than 25% and at most 50%.
    Medium,
    /// More than 50%.
    High,
}

impl RiskLevel {
    pub fn from_unallocated_pct(pct: f64) -> Self {
        if pct > 50.0 {
            Self::High
        } else if pct > 25.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Compliance grade of a group, by fully-tagged share of its resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl ComplianceLevel {
    pub fn from_compliance_pct(pct: f64) -> Self {
        if pct >= 80.0 {
            Self::Excellent
        } else if pct >= 60.0 {
            Self::Good
        } else if pct >= 40.0 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poor => write!(f, "Poor"),
            Self::Fair => write!(f, "Fair"),
            Self::Good => write!(f, "Good"),
            Self::Excellent => write!(f, "Excellent"),
        }
    }
}

/// Totals for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: String,
    pub resource_count: usize,
    pub fully_tagged_count: usize,
    pub untagged_count: usize,
    pub total_cost: Decimal,
    pub untagged_cost: Decimal,
    pub unallocated_cost: Decimal,
    /// This group's cost as a percentage of the collection's cost.
    pub share_of_total_pct: f64,
}

impl GroupSummary {
    fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            resource_count: 0,
            fully_tagged_count: 0,
            untagged_count: 0,
            total_cost: Decimal::ZERO,
            untagged_cost: Decimal::ZERO,
            unallocated_cost: Decimal::ZERO,
            share_of_total_pct: 0.0,
        }
    }

    fn add(&mut self, cost: Decimal, status: TagStatus) {
        self.resource_count += 1;
        self.total_cost += cost;
        if !status.is_allocatable() {
            self.unallocated_cost += cost;
        }
        match status {
            TagStatus::FullyTagged => self.fully_tagged_count += 1,
            TagStatus::Partial => {}
            TagStatus::Untagged => {
                self.untagged_count += 1;
                self.untagged_cost += cost;
            }
        }
    }

    /// Cost of fully tagged resources in the group.
    pub fn allocated_cost(&self) -> Decimal {
        self.total_cost - self.unallocated_cost
    }

    /// Fully tagged resources as a percentage of the group.
    pub fn compliance_pct(&self) -> f64 {
        percentage(self.fully_tagged_count as f64, self.resource_count as f64)
    }

    /// Unallocated cost as a percentage of the group's cost.
    pub fn unallocated_cost_pct(&self) -> f64 {
        decimal_percentage(self.unallocated_cost, self.total_cost)
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_unallocated_pct(self.unallocated_cost_pct())
    }

    pub fn compliance_level(&self) -> ComplianceLevel {
        ComplianceLevel::from_compliance_pct(self.compliance_pct())
    }
}

/// Group `records` and total each group.
///
/// Groups are ordered by total cost, highest first, ties by key.
pub fn breakdown(
    records: &[ResourceRecord],
    required_tags: &RequiredTags,
    group_by: &GroupBy,
) -> Result<Vec<GroupSummary>, TagwatchError> {
    let total = validate_costs(records)?;

    let mut groups: BTreeMap<&str, GroupSummary> = BTreeMap::new();
    for record in records {
        let key = group_by.key_of(record);
        let status = TagCoverage::measure(record, required_tags).status();
        groups
            .entry(key)
            .or_insert_with(|| GroupSummary::new(key))
            .add(record.monthly_cost, status);
    }

    let mut out: Vec<GroupSummary> = groups
        .into_values()
        .map(|mut g| {
            g.share_of_total_pct = decimal_percentage(g.total_cost, total);
            g
        })
        .collect();
    out.sort_by(|a, b| b.total_cost.cmp(&a.total_cost).then_with(|| a.key.cmp(&b.key)));
    tracing::debug!(group_by = group_by.label(), groups = out.len(), "computed breakdown");
    Ok(out)
}

/// The group carrying the most unallocated cost, if any cost is unallocated.
pub fn worst_group(groups: &[GroupSummary]) -> Option<&GroupSummary> {
    groups
        .iter()
        .filter(|g| !g.unallocated_cost.is_zero())
        .max_by(|a, b| {
            a.unallocated_cost
                .cmp(&b.unallocated_cost)
                .then_with(|| b.key.cmp(&a.key))
        })
}

/// One cell of a two-dimensional compliance grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixCell {
    pub row: String,
    pub column: String,
    pub resource_count: usize,
    pub fully_tagged_count: usize,
    pub compliance_pct: f64,
}

/// Compliance percentage for every (row, column) pair with at least
/// `min_group` resources. Cells are ordered by row, then column.
pub fn compliance_matrix(
    records: &[ResourceRecord],
    required_tags: &RequiredTags,
    rows: Dimension,
    columns: Dimension,
    min_group: usize,
) -> Result<Vec<MatrixCell>, TagwatchError> {
    validate_costs(records)?;

    let mut cells: BTreeMap<(&str, &str), (usize, usize)> = BTreeMap::new();
    for record in records {
        let fully = TagCoverage::measure(record, required_tags).status() == TagStatus::FullyTagged;
        let entry = cells
            .entry((record.dimension(rows), record.dimension(columns)))
            .or_insert((0, 0));
        entry.0 += 1;
        if fully {
            entry.1 += 1;
        }
    }

    Ok(cells
        .into_iter()
        .filter(|(_, (count, _))| *count >= min_group)
        .map(|((row, column), (count, fully))| MatrixCell {
            row: row.to_string(),
            column: column.to_string(),
            resource_count: count,
            fully_tagged_count: fully,
            compliance_pct: percentage(fully as f64, count as f64),
        })
        .collect())
}
