//! # Compliance Report
//!
//! [`compute`] turns a record collection and a required-tag policy into a
//! [`ComplianceReport`]: counts, costs, per-resource completeness scores,
//! and missing-tag frequencies.
//!
//! ## Definitions
//!
//! - **completeness score**: required tags present / required tags, in `[0, 1]`.
//! - **untagged**: score == 0. **fully tagged**: score == 1.
//! - **untagged cost**: cost of untagged resources.
//! - **unallocated cost**: cost of every resource that is not fully tagged.
//!   Always `untagged cost <= unallocated cost <= total cost`.
//!
//! Percentages keep full precision; rounding is the caller's concern.
//! An empty collection yields zeros everywhere rather than a division error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tagwatch_core::{RequiredTags, ResourceId, ResourceRecord, TagwatchError};

use crate::coverage::{TagCoverage, TagStatus};
use crate::threshold::CompletenessThreshold;

/// Completeness of one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceScore {
    pub resource_id: ResourceId,
    pub service: String,
    pub department: String,
    pub monthly_cost: Decimal,
    /// Required tags present.
    pub present: usize,
    /// Fraction of required tags present.
    pub score: f64,
    pub status: TagStatus,
    /// Missing required keys, in configured order.
    pub missing: Vec<String>,
}

/// How often one required tag is missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingTagCount {
    pub tag: String,
    pub missing: usize,
    /// `missing` as a percentage of all resources.
    pub missing_pct: f64,
}

impl MissingTagCount {
    /// Share of resources carrying this tag, as a percentage.
    pub fn present_pct(&self, total_resources: usize) -> f64 {
        if total_resources == 0 {
            0.0
        } else {
            100.0 - self.missing_pct
        }
    }
}

/// Aggregate compliance and cost view over a record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceReport {
    pub required_tags: RequiredTags,
    pub total_resources: usize,
    pub fully_tagged_count: usize,
    pub partially_tagged_count: usize,
    pub untagged_count: usize,
    pub total_cost: Decimal,
    pub untagged_cost: Decimal,
    pub unallocated_cost: Decimal,
    /// One entry per record, in input order.
    pub scores: Vec<ResourceScore>,
    /// One entry per required tag, most frequently missing first,
    /// ties broken alphabetically by key.
    pub missing_tags: Vec<MissingTagCount>,
}

/// Compute a report for `records` under `required_tags`.
///
/// # Errors
///
/// [`TagwatchError::InvalidInput`] if any record has a negative cost or a
/// cost above [`MAX_MONTHLY_COST`](tagwatch_core::MAX_MONTHLY_COST).
pub fn compute(
    records: &[ResourceRecord],
    required_tags: &RequiredTags,
) -> Result<ComplianceReport, TagwatchError> {
    let total_cost = validate_costs(records)?;

    let mut scores = Vec::with_capacity(records.len());
    let mut missing_counts = vec![0usize; required_tags.len()];
    let mut fully_tagged_count = 0;
    let mut partially_tagged_count = 0;
    let mut untagged_count = 0;
    let mut untagged_cost = Decimal::ZERO;
    let mut unallocated_cost = Decimal::ZERO;

    for record in records {
        let coverage = TagCoverage::measure(record, required_tags);
        let status = coverage.status();

        if !status.is_allocatable() {
            unallocated_cost += record.monthly_cost;
        }
        match status {
            TagStatus::FullyTagged => fully_tagged_count += 1,
            TagStatus::Partial => partially_tagged_count += 1,
            TagStatus::Untagged => {
                untagged_count += 1;
                untagged_cost += record.monthly_cost;
            }
        }

        for (slot, key) in missing_counts.iter_mut().zip(required_tags.iter()) {
            if !record.has_tag(key) {
                *slot += 1;
            }
        }

        scores.push(ResourceScore {
            resource_id: record.resource_id.clone(),
            service: record.service.clone(),
            department: record.department.clone(),
            monthly_cost: record.monthly_cost,
            present: coverage.present,
            score: coverage.score(),
            status,
            missing: coverage.missing,
        });
    }

    let total = records.len();
    let mut missing_tags: Vec<MissingTagCount> = required_tags
        .iter()
        .zip(missing_counts)
        .map(|(tag, missing)| MissingTagCount {
            tag: tag.to_string(),
            missing,
            missing_pct: percentage(missing as f64, total as f64),
        })
        .collect();
    missing_tags.sort_by(|a, b| b.missing.cmp(&a.missing).then_with(|| a.tag.cmp(&b.tag)));

    tracing::debug!(
        resources = total,
        fully_tagged = fully_tagged_count,
        untagged = untagged_count,
        "computed compliance report"
    );

    Ok(ComplianceReport {
        required_tags: required_tags.clone(),
        total_resources: total,
        fully_tagged_count,
        partially_tagged_count,
        untagged_count,
        total_cost,
        untagged_cost,
        unallocated_cost,
        scores,
        missing_tags,
    })
}

impl ComplianceReport {
    /// Fully tagged resources as a percentage of all resources.
    pub fn compliance_pct(&self) -> f64 {
        percentage(self.fully_tagged_count as f64, self.total_resources as f64)
    }

    /// Untagged resources as a percentage of all resources.
    pub fn untagged_pct(&self) -> f64 {
        percentage(self.untagged_count as f64, self.total_resources as f64)
    }

    /// Untagged cost as a percentage of total cost.
    pub fn untagged_cost_pct(&self) -> f64 {
        decimal_percentage(self.untagged_cost, self.total_cost)
    }

    /// Unallocated cost as a percentage of total cost.
    pub fn unallocated_cost_pct(&self) -> f64 {
        decimal_percentage(self.unallocated_cost, self.total_cost)
    }

    /// Cost of fully tagged resources.
    pub fn allocated_cost(&self) -> Decimal {
        self.total_cost - self.unallocated_cost
    }

    /// Mean completeness score in `[0, 1]`; 0 for an empty collection.
    pub fn average_completeness(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().map(|s| s.score).sum::<f64>() / self.scores.len() as f64
    }

    /// Per-tag presence percentage, in configured tag order.
    pub fn field_completeness(&self) -> Vec<(String, f64)> {
        self.required_tags
            .iter()
            .map(|tag| {
                let pct = self
                    .missing_tags
                    .iter()
                    .find(|m| m.tag == tag)
                    .map(|m| m.present_pct(self.total_resources))
                    .unwrap_or(0.0);
                (tag.to_string(), pct)
            })
            .collect()
    }

    /// The `n` least complete resources: lowest score first, then highest
    /// cost, then identifier.
    pub fn lowest(&self, n: usize) -> Vec<&ResourceScore> {
        let mut ranked: Vec<&ResourceScore> = self.scores.iter().collect();
        ranked.sort_by(|a, b| {
            a.present
                .cmp(&b.present)
                .then_with(|| b.monthly_cost.cmp(&a.monthly_cost))
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });
        ranked.truncate(n);
        ranked
    }

    /// Resources scoring strictly below `threshold`, in input order.
    pub fn below_threshold(&self, threshold: CompletenessThreshold) -> Vec<&ResourceScore> {
        self.scores
            .iter()
            .filter(|s| threshold.is_below(s.score))
            .collect()
    }

    /// Resources with the given status, most expensive first.
    pub fn with_status(&self, status: TagStatus) -> Vec<&ResourceScore> {
        let mut out: Vec<&ResourceScore> =
            self.scores.iter().filter(|s| s.status == status).collect();
        out.sort_by(|a, b| {
            b.monthly_cost
                .cmp(&a.monthly_cost)
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });
        out
    }

    /// Score for one resource.
    pub fn score_of(&self, resource_id: &str) -> Option<&ResourceScore> {
        self.scores
            .iter()
            .find(|s| s.resource_id.as_str() == resource_id)
    }

    /// The most frequently missing tag, if any tag is missing at all.
    pub fn most_missing_tag(&self) -> Option<&MissingTagCount> {
        self.missing_tags.first().filter(|m| m.missing > 0)
    }
}

/// Check every cost and return the collection total. Costs are
/// non-negative, so any subset total is bounded by the returned value.
pub(crate) fn validate_costs(records: &[ResourceRecord]) -> Result<Decimal, TagwatchError> {
    let mut total = Decimal::ZERO;
    for record in records {
        record.validate_cost()?;
        total = total.checked_add(record.monthly_cost).ok_or_else(|| {
            TagwatchError::InvalidInput("total monthly cost overflows".to_string())
        })?;
    }
    Ok(total)
}

pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

pub(crate) fn decimal_percentage(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}
