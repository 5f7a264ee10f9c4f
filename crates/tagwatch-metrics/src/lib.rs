//! # tagwatch-metrics: Tagging Compliance & Cost Governance
//!
//! Pure computations over `&[ResourceRecord]`. Nothing in this crate
//! performs I/O or mutates its input; every function returns fresh values.
//!
//! | Module         | Purpose                                                   |
//! |----------------|-----------------------------------------------------------|
//! | `coverage`     | Per-resource completeness score and [`TagStatus`]         |
//! | `report`       | [`ComplianceReport`]: KPIs, scores, missing-tag ranking   |
//! | `threshold`    | Configurable low-compliance [`CompletenessThreshold`]     |
//! | `filter`       | Multi-select [`RecordFilter`] over dimensions             |
//! | `breakdown`    | Group totals, risk levels, compliance matrix              |
//! | `remediation`  | Before/after simulation of proposed tag edits             |
//! | `quality`      | [`DataQuality`] score                                     |
//! | `engine`       | [`ComplianceEngine`] facade binding policy and threshold  |
//!
//! Costs stay in `Decimal` end to end; percentages are `f64` at full
//! precision and are rounded only by presentation code.

pub mod breakdown;
pub mod coverage;
pub mod engine;
pub mod filter;
pub mod quality;
pub mod remediation;
pub mod report;
pub mod threshold;

pub use breakdown::{
    breakdown, compliance_matrix, worst_group, ComplianceLevel, GroupBy, GroupSummary, MatrixCell,
    RiskLevel, MISSING_GROUP,
};
pub use coverage::{TagCoverage, TagStatus};
pub use engine::{ComplianceEngine, DEFAULT_MATRIX_MIN_GROUP};
pub use filter::{distinct_values, RecordFilter};
pub use quality::DataQuality;
pub use remediation::{
    apply_edits, RemediationImpact, RemediationLogEntry, RemediationOutcome, TagEdits,
};
pub use report::{compute, ComplianceReport, MissingTagCount, ResourceScore};
pub use threshold::CompletenessThreshold;
