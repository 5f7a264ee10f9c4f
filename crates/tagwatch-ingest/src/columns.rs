//! # Column Mapping & Load Options
//!
//! Inventory exports name their columns differently. [`ColumnMapping`] maps
//! each record attribute to a CSV column; the defaults match the common
//! `ResourceID, Service, Region, Department, Environment, MonthlyCostUSD`
//! layout.

use serde::{Deserialize, Serialize};
use tagwatch_core::{Dimension, RequiredTags};

/// Record attribute → CSV column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnMapping {
    #[serde(default = "default_resource_id")]
    pub resource_id: String,
    #[serde(default = "default_service")]
    pub service: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_department")]
    pub department: String,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_monthly_cost")]
    pub monthly_cost: String,
}

fn default_resource_id() -> String {
    "ResourceID".into()
}
fn default_service() -> String {
    Dimension::Service.label().into()
}
fn default_region() -> String {
    Dimension::Region.label().into()
}
fn default_department() -> String {
    Dimension::Department.label().into()
}
fn default_environment() -> String {
    Dimension::Environment.label().into()
}
fn default_monthly_cost() -> String {
    "MonthlyCostUSD".into()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            resource_id: default_resource_id(),
            service: default_service(),
            region: default_region(),
            department: default_department(),
            environment: default_environment(),
            monthly_cost: default_monthly_cost(),
        }
    }
}

impl ColumnMapping {
    /// Column holding the given dimension.
    pub fn column_for(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Service => &self.service,
            Dimension::Region => &self.region,
            Dimension::Department => &self.department,
            Dimension::Environment => &self.environment,
        }
    }

    /// The dimension stored in `column`, if it is a dimension column.
    pub fn dimension_of(&self, column: &str) -> Option<Dimension> {
        Dimension::all()
            .iter()
            .copied()
            .find(|d| self.column_for(*d) == column)
    }

    /// Every column a file must contain: mapped attributes first, then
    /// required tag columns not already listed.
    pub fn required_columns<'a>(&'a self, tags: &'a RequiredTags) -> Vec<&'a str> {
        let mut cols: Vec<&str> = vec![
            self.resource_id.as_str(),
            self.service.as_str(),
            self.region.as_str(),
            self.department.as_str(),
            self.environment.as_str(),
            self.monthly_cost.as_str(),
        ];
        for key in tags.iter() {
            if !cols.contains(&key) {
                cols.push(key);
            }
        }
        cols
    }
}

/// What to do when a resource identifier appears more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first row for each identifier and drop the rest.
    #[default]
    KeepFirst,
    /// Fail the load with a schema error.
    Reject,
}

/// Everything the loader needs to know about a file.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub columns: ColumnMapping,
    pub required_tags: RequiredTags,
    pub duplicates: DuplicatePolicy,
}

impl LoadOptions {
    /// Default column mapping and duplicate policy for the given tags.
    pub fn new(required_tags: RequiredTags) -> Self {
        Self {
            columns: ColumnMapping::default(),
            required_tags,
            duplicates: DuplicatePolicy::default(),
        }
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }
}
