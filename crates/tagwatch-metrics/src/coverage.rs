//! # Tag Coverage
//!
//! Per-resource measurement of how many required tags are present, and the
//! [`TagStatus`] classification derived from it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tagwatch_core::{RequiredTags, ResourceRecord};

/// Tagging classification of a single resource.
///
/// Ordering (worst → best): `Untagged < Partial < FullyTagged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagStatus {
    /// None of the required tags is present.
    Untagged,
    /// Some but not all required tags are present.
    Partial,
    /// Every required tag is present.
    FullyTagged,
}

impl TagStatus {
    /// Whether the resource's cost can be fully attributed.
    pub fn is_allocatable(self) -> bool {
        matches!(self, Self::FullyTagged)
    }
}

impl fmt::Display for TagStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untagged => write!(f, "untagged"),
            Self::Partial => write!(f, "partial"),
            Self::FullyTagged => write!(f, "fully_tagged"),
        }
    }
}

/// Present/required tag counts for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCoverage {
    /// Required keys with a non-blank value.
    pub present: usize,
    /// Number of required keys. Never zero.
    pub required: usize,
    /// Required keys that are absent or blank, in configured order.
    pub missing: Vec<String>,
}

impl TagCoverage {
    /// Measure `record` against `tags`.
    pub fn measure(record: &ResourceRecord, tags: &RequiredTags) -> Self {
        let missing: Vec<String> = tags
            .iter()
            .filter(|key| !record.has_tag(key))
            .map(str::to_string)
            .collect();
        Self {
            present: tags.len() - missing.len(),
            required: tags.len(),
            missing,
        }
    }

    /// Fraction of required tags present, in `[0, 1]`.
    pub fn score(&self) -> f64 {
        if self.required == 0 {
            return 0.0;
        }
        self.present as f64 / self.required as f64
    }

    /// Classification derived from the counts.
    pub fn status(&self) -> TagStatus {
        if self.present == 0 {
            TagStatus::Untagged
        } else if self.present == self.required {
            TagStatus::FullyTagged
        } else {
            TagStatus::Partial
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwatch_core::{Decimal, ResourceId};

    fn tags() -> RequiredTags {
        RequiredTags::new(["Owner", "Project", "CostCenter"]).unwrap()
    }

    fn record() -> ResourceRecord {
        ResourceRecord::new(ResourceId::new("r1").unwrap(), Decimal::ONE)
    }

    #[test]
    fn no_tags_is_untagged() {
        let c = TagCoverage::measure(&record(), &tags());
        assert_eq!(c.present, 0);
        assert_eq!(c.score(), 0.0);
        assert_eq!(c.status(), TagStatus::Untagged);
        assert_eq!(c.missing, vec!["Owner", "Project", "CostCenter"]);
    }

    #[test]
    fn some_tags_is_partial() {
        let r = record().with_tag("Project", "x").with_tag("Owner", " ");
        let c = TagCoverage::measure(&r, &tags());
        assert_eq!(c.present, 1);
        assert!((c.score() - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(c.status(), TagStatus::Partial);
        assert_eq!(c.missing, vec!["Owner", "CostCenter"]);
    }

    #[test]
    fn all_tags_is_fully_tagged() {
        let r = record()
            .with_tag("Owner", "a")
            .with_tag("Project", "b")
            .with_tag("CostCenter", "c");
        let c = TagCoverage::measure(&r, &tags());
        assert_eq!(c.score(), 1.0);
        assert_eq!(c.status(), TagStatus::FullyTagged);
        assert!(c.missing.is_empty());
    }

    #[test]
    fn status_ordering() {
        assert!(TagStatus::Untagged < TagStatus::Partial);
        assert!(TagStatus::Partial < TagStatus::FullyTagged);
        assert!(TagStatus::FullyTagged.is_allocatable());
        assert!(!TagStatus::Partial.is_allocatable());
    }

    #[test]
    fn tags_outside_policy_do_not_count() {
        let r = record().with_tag("Team", "infra");
        assert_eq!(TagCoverage::measure(&r, &tags()).present, 0);
    }
}
