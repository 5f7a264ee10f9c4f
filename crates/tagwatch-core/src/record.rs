//! # Resource Records
//!
//! A [`ResourceRecord`] is one row of a cloud inventory export: identity,
//! grouping attributes, monthly cost, tag values, and any pass-through
//! columns the export carried. Records are plain values; every
//! transformation in tagwatch produces new records rather than mutating
//! shared ones.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::dimension::{Dimension, UNKNOWN_VALUE};
use crate::error::ValidationError;
use crate::identity::ResourceId;

/// Largest monthly cost a single record may carry. Keeps collection totals
/// (and annualised figures) well inside `Decimal` range.
pub const MAX_MONTHLY_COST: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// One cloud resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Unique identifier within the dataset.
    pub resource_id: ResourceId,
    /// Cloud service.
    pub service: String,
    /// Deployment region.
    pub region: String,
    /// Owning department.
    pub department: String,
    /// Deployment environment.
    pub environment: String,
    /// Monthly cost in the dataset currency. Must be non-negative.
    pub monthly_cost: Decimal,
    /// Tag key → value. An absent key or a blank value means the tag is missing.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Columns carried through from the source file untouched.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl ResourceRecord {
    /// Create a record with every dimension set to [`UNKNOWN_VALUE`] and no tags.
    pub fn new(resource_id: ResourceId, monthly_cost: Decimal) -> Self {
        Self {
            resource_id,
            service: UNKNOWN_VALUE.to_string(),
            region: UNKNOWN_VALUE.to_string(),
            department: UNKNOWN_VALUE.to_string(),
            environment: UNKNOWN_VALUE.to_string(),
            monthly_cost,
            tags: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Builder-style dimension setter.
    pub fn with_dimension(mut self, dimension: Dimension, value: impl Into<String>) -> Self {
        self.set_dimension(dimension, value);
        self
    }

    /// Builder-style tag setter. Blank values are stored and count as missing.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_tag(key, value);
        self
    }

    /// Value of a grouping dimension.
    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Service => &self.service,
            Dimension::Region => &self.region,
            Dimension::Department => &self.department,
            Dimension::Environment => &self.environment,
        }
    }

    /// Set a grouping dimension; a blank value becomes [`UNKNOWN_VALUE`].
    pub fn set_dimension(&mut self, dimension: Dimension, value: impl Into<String>) {
        let value = normalize_dimension(value.into());
        let slot = match dimension {
            Dimension::Service => &mut self.service,
            Dimension::Region => &mut self.region,
            Dimension::Department => &mut self.department,
            Dimension::Environment => &mut self.environment,
        };
        *slot = value;
    }

    /// The tag's value, or `None` when the tag is absent or blank.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Whether the tag is present with a non-blank value.
    pub fn has_tag(&self, key: &str) -> bool {
        self.tag_value(key).is_some()
    }

    /// Value of a tag or pass-through column, or `None` when absent or blank.
    ///
    /// Tags take precedence over pass-through columns of the same name.
    pub fn field_value(&self, key: &str) -> Option<&str> {
        self.tag_value(key).or_else(|| {
            self.extra
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        })
    }

    /// Set a tag value.
    ///
    /// A tag named after a dimension (`Department`, `Environment`, ...) also
    /// updates that dimension when the value is non-blank.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into().trim().to_string();
        if !value.is_empty() {
            if let Some(dimension) = Dimension::for_tag_key(&key) {
                self.set_dimension(dimension, value.clone());
            }
        }
        self.tags.insert(key, value);
    }

    /// Reject negative costs and costs above [`MAX_MONTHLY_COST`].
    pub fn validate_cost(&self) -> Result<(), ValidationError> {
        check_cost(self.resource_id.as_str(), self.monthly_cost)
    }
}

/// Bounds check shared by records and the CSV loader.
pub fn check_cost(resource: &str, cost: Decimal) -> Result<(), ValidationError> {
    if cost.is_sign_negative() && !cost.is_zero() {
        return Err(ValidationError::NegativeCost {
            resource: resource.to_string(),
            cost: cost.to_string(),
        });
    }
    if cost > MAX_MONTHLY_COST {
        return Err(ValidationError::CostTooLarge {
            resource: resource.to_string(),
            cost: cost.to_string(),
        });
    }
    Ok(())
}

fn normalize_dimension(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN_VALUE.to_string()
    } else {
        trimmed.to_string()
    }
}
