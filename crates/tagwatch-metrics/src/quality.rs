//! # Data Quality
//!
//! A single 0–100 score blending how clean the inventory export was
//! (duplicate rows dropped at load) with how well it is tagged.

use serde::Serialize;

use crate::report::ComplianceReport;

const UNIQUENESS_WEIGHT: f64 = 0.7;
const COMPLIANCE_WEIGHT: f64 = 0.3;

/// Data-quality assessment of a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataQuality {
    /// Duplicate rows as a percentage of rows read.
    pub duplication_pct: f64,
    /// Fully tagged resources as a percentage of unique resources.
    pub compliance_pct: f64,
    /// Weighted score in `[0, 100]`.
    pub score: f64,
}

impl DataQuality {
    /// `(100 - duplication %) * 0.7 + compliance % * 0.3`, both inputs
    /// clamped to `[0, 100]`.
    pub fn assess(duplication_pct: f64, report: &ComplianceReport) -> Self {
        let duplication_pct = clamp_pct(duplication_pct);
        let compliance_pct = clamp_pct(report.compliance_pct());
        Self {
            duplication_pct,
            compliance_pct,
            score: (100.0 - duplication_pct) * UNIQUENESS_WEIGHT
                + compliance_pct * COMPLIANCE_WEIGHT,
        }
    }
}

fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::compute;
    use tagwatch_core::{Decimal, RequiredTags, ResourceId, ResourceRecord};

    fn report(fully: usize, total: usize) -> ComplianceReport {
        let records: Vec<ResourceRecord> = (0..total)
            .map(|i| {
                let r = ResourceRecord::new(ResourceId::new(format!("r{i}")).unwrap(), Decimal::ONE);
                if i < fully {
                    r.with_tag("Owner", "a")
                } else {
                    r
                }
            })
            .collect();
        compute(&records, &RequiredTags::new(["Owner"]).unwrap()).unwrap()
    }

    #[test]
    fn weighted_blend() {
        let q = DataQuality::assess(10.0, &report(1, 2));
        assert!((q.score - (90.0 * 0.7 + 50.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn clean_and_compliant_is_hundred() {
        assert!((DataQuality::assess(0.0, &report(4, 4)).score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_scores_uniqueness_only() {
        let q = DataQuality::assess(0.0, &report(0, 0));
        assert!((q.score - 70.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_duplication_clamped() {
        assert_eq!(DataQuality::assess(150.0, &report(0, 1)).duplication_pct, 100.0);
        assert_eq!(DataQuality::assess(f64::NAN, &report(0, 1)).duplication_pct, 0.0);
    }
}
