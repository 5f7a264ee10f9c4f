//! # Remediation Simulation
//!
//! Applies proposed tag values to a copy of a record collection and reports
//! the compliance before and after. The input collection is never touched.
//!
//! ## Rules
//!
//! - Every edited resource id must exist, else `UnknownResource`.
//! - Every edited key must be a required tag, else `InvalidInput`.
//! - Blank values are skipped; an edit can fill a tag, never clear one.
//! - Edits apply in sorted order (resource id, then tag key), so the result
//!   and the log are deterministic.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tagwatch_core::{RequiredTags, ResourceRecord, TagwatchError};

use crate::report::{compute, percentage, ComplianceReport};

/// Proposed tag values: resource id → (tag key → value).
pub type TagEdits = BTreeMap<String, BTreeMap<String, String>>;

/// One resource touched by a remediation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationLogEntry {
    pub resource_id: String,
    /// Tag keys written, sorted.
    pub tags_written: Vec<String>,
    pub applied_at: DateTime<Utc>,
}

/// Result of [`apply_edits`].
#[derive(Debug, Clone)]
pub struct RemediationOutcome {
    /// The edited collection, in input order.
    pub records: Vec<ResourceRecord>,
    pub before: ComplianceReport,
    pub after: ComplianceReport,
    pub log: Vec<RemediationLogEntry>,
}

/// Before/after deltas of a remediation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationImpact {
    pub resources_remediated: usize,
    pub untagged_before: usize,
    pub untagged_after: usize,
    /// Resources not fully tagged.
    pub incomplete_before: usize,
    pub incomplete_after: usize,
    pub untagged_cost_recovered: Decimal,
    pub unallocated_cost_recovered: Decimal,
    /// Share of previously incomplete resources that became fully tagged.
    pub progress_pct: f64,
    /// Change in compliance percentage points.
    pub compliance_delta_pct: f64,
}

impl RemediationOutcome {
    pub fn impact(&self) -> RemediationImpact {
        let incomplete_before = self.before.total_resources - self.before.fully_tagged_count;
        let incomplete_after = self.after.total_resources - self.after.fully_tagged_count;
        let fixed = incomplete_before.saturating_sub(incomplete_after);
        RemediationImpact {
            resources_remediated: self.log.len(),
            untagged_before: self.before.untagged_count,
            untagged_after: self.after.untagged_count,
            incomplete_before,
            incomplete_after,
            untagged_cost_recovered: self.before.untagged_cost - self.after.untagged_cost,
            unallocated_cost_recovered: self.before.unallocated_cost
                - self.after.unallocated_cost,
            progress_pct: percentage(fixed as f64, incomplete_before as f64),
            compliance_delta_pct: self.after.compliance_pct() - self.before.compliance_pct(),
        }
    }
}

/// Simulate `edits` against `records`.
///
/// # Errors
///
/// - [`TagwatchError::UnknownResource`] for an id not in `records`.
/// - [`TagwatchError::InvalidInput`] for a key outside `required_tags`, or
///   a negative cost in `records`.
pub fn apply_edits(
    records: &[ResourceRecord],
    required_tags: &RequiredTags,
    edits: &TagEdits,
) -> Result<RemediationOutcome, TagwatchError> {
    let before = compute(records, required_tags)?;

    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for (pos, record) in records.iter().enumerate() {
        index.entry(record.resource_id.as_str()).or_insert(pos);
    }

    for (resource_id, values) in edits {
        if !index.contains_key(resource_id.as_str()) {
            return Err(TagwatchError::UnknownResource(resource_id.clone()));
        }
        if let Some(key) = values.keys().find(|k| !required_tags.contains(k)) {
            return Err(TagwatchError::InvalidInput(format!(
                "tag {key:?} on {resource_id} is not a required tag"
            )));
        }
    }

    let mut updated = records.to_vec();
    let applied_at = Utc::now();
    let mut log = Vec::new();
    for (resource_id, values) in edits {
        let Some(&pos) = index.get(resource_id.as_str()) else {
            continue;
        };
        let record = &mut updated[pos];
        let mut written = BTreeSet::new();
        for (key, value) in values {
            if value.trim().is_empty() {
                continue;
            }
            record.set_tag(key.as_str(), value.as_str());
            written.insert(key.clone());
        }
        if !written.is_empty() {
            tracing::debug!(resource = %resource_id, tags = written.len(), "applied tag edits");
            log.push(RemediationLogEntry {
                resource_id: resource_id.clone(),
                tags_written: written.into_iter().collect(),
                applied_at,
            });
        }
    }

    let after = compute(&updated, required_tags)?;
    tracing::info!(
        resources = log.len(),
        compliance_before = before.compliance_pct(),
        compliance_after = after.compliance_pct(),
        "remediation simulated"
    );

    Ok(RemediationOutcome {
        records: updated,
        before,
        after,
        log,
    })
}
