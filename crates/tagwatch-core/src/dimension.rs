//! # Grouping Dimensions
//!
//! Defines the `Dimension` enum: the record attributes that costs and
//! compliance can be broken down by. Every `match` on `Dimension` is
//! exhaustive, so adding an axis forces every breakdown and filter to
//! handle it.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// Placeholder for a blank dimension value, so every record lands in a group.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// A record attribute that resources can be grouped by.
///
/// | Dimension | Default CSV column |
/// |-----------|--------------------|
/// | Service | `Service` |
/// | Region | `Region` |
/// | Department | `Department` |
/// | Environment | `Environment` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Cloud service (EC2, S3, RDS, ...).
    Service,
    /// Deployment region.
    Region,
    /// Owning department, the showback/chargeback unit.
    Department,
    /// Deployment environment (Prod, Dev, Test, ...).
    Environment,
}

impl Dimension {
    /// Returns all dimensions in canonical order.
    pub fn all() -> &'static [Dimension] {
        &[
            Self::Service,
            Self::Region,
            Self::Department,
            Self::Environment,
        ]
    }

    /// Returns the snake_case identifier, matching the serde format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Region => "region",
            Self::Department => "department",
            Self::Environment => "environment",
        }
    }

    /// Human-readable label, also the default CSV column name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Region => "Region",
            Self::Department => "Department",
            Self::Environment => "Environment",
        }
    }

    /// The dimension a tag key stands for, if any.
    ///
    /// Matching is case-insensitive, so a `Department` or `environment` tag
    /// both resolve.
    pub fn for_tag_key(key: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(key.trim()))
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = ValidationError;

    /// Parse a dimension name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_tag_key(s).ok_or_else(|| ValidationError::UnknownDimension(s.to_string()))
    }
}
