//! # Compliance Engine
//!
//! [`ComplianceEngine`] binds a required-tag policy and a low-compliance
//! threshold so callers configure them once and then run every metric
//! against the same policy.

use tagwatch_core::{Dimension, RequiredTags, ResourceRecord, TagwatchError};

use crate::breakdown::{breakdown, compliance_matrix, GroupBy, GroupSummary, MatrixCell};
use crate::remediation::{apply_edits, RemediationOutcome, TagEdits};
use crate::report::{compute, ComplianceReport, ResourceScore};
use crate::threshold::CompletenessThreshold;

/// Default minimum resources per compliance matrix cell.
pub const DEFAULT_MATRIX_MIN_GROUP: usize = 2;

/// Tagging-policy evaluator.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    required_tags: RequiredTags,
    threshold: CompletenessThreshold,
}

impl ComplianceEngine {
    pub fn new(required_tags: RequiredTags) -> Self {
        Self {
            required_tags,
            threshold: CompletenessThreshold::default(),
        }
    }

    pub fn with_threshold(mut self, threshold: CompletenessThreshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn required_tags(&self) -> &RequiredTags {
        &self.required_tags
    }

    pub fn threshold(&self) -> CompletenessThreshold {
        self.threshold
    }

    pub fn compute(&self, records: &[ResourceRecord]) -> Result<ComplianceReport, TagwatchError> {
        compute(records, &self.required_tags)
    }

    pub fn breakdown(
        &self,
        records: &[ResourceRecord],
        group_by: &GroupBy,
    ) -> Result<Vec<GroupSummary>, TagwatchError> {
        breakdown(records, &self.required_tags, group_by)
    }

    pub fn matrix(
        &self,
        records: &[ResourceRecord],
        rows: Dimension,
        columns: Dimension,
        min_group: usize,
    ) -> Result<Vec<MatrixCell>, TagwatchError> {
        compliance_matrix(records, &self.required_tags, rows, columns, min_group)
    }

    pub fn apply_edits(
        &self,
        records: &[ResourceRecord],
        edits: &TagEdits,
    ) -> Result<RemediationOutcome, TagwatchError> {
        apply_edits(records, &self.required_tags, edits)
    }

    /// Resources below the configured threshold, in input order.
    pub fn low_compliance<'r>(&self, report: &'r ComplianceReport) -> Vec<&'r ResourceScore> {
        report.below_threshold(self.threshold)
    }
}
