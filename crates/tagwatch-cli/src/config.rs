//! # Configuration
//!
//! Optional YAML file holding the tagging policy and loader settings.
//! Unknown keys are rejected so a typo never silently falls back to a
//! default. A missing `--config` means built-in defaults.
//!
//! ```yaml
//! required_tags: [Department, Project, Environment, Owner, CostCenter, CreatedBy]
//! low_compliance_threshold: 0.5
//! duplicates: keep_first
//! matrix_min_group: 2
//! columns:
//!   monthly_cost: CostUSD
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tagwatch_core::RequiredTags;
use tagwatch_ingest::{ColumnMapping, DuplicatePolicy, LoadOptions};
use tagwatch_metrics::{CompletenessThreshold, DEFAULT_MATRIX_MIN_GROUP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagwatchConfig {
    #[serde(default)]
    pub required_tags: RequiredTags,
    #[serde(default)]
    pub low_compliance_threshold: CompletenessThreshold,
    #[serde(default)]
    pub duplicates: DuplicatePolicy,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default = "default_matrix_min_group")]
    pub matrix_min_group: usize,
}

fn default_matrix_min_group() -> usize {
    DEFAULT_MATRIX_MIN_GROUP
}

impl Default for TagwatchConfig {
    fn default() -> Self {
        Self {
            required_tags: RequiredTags::default(),
            low_compliance_threshold: CompletenessThreshold::default(),
            duplicates: DuplicatePolicy::default(),
            columns: ColumnMapping::default(),
            matrix_min_group: default_matrix_min_group(),
        }
    }
}

impl TagwatchConfig {
    /// Load from `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        tracing::info!(path = %path.display(), tags = config.required_tags.len(), "loaded config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject column mappings that reuse one CSV column for two attributes.
    pub fn validate(&self) -> Result<()> {
        let c = &self.columns;
        let mapped = [
            &c.resource_id,
            &c.service,
            &c.region,
            &c.department,
            &c.environment,
            &c.monthly_cost,
        ];
        for (i, a) in mapped.iter().enumerate() {
            if a.trim().is_empty() {
                anyhow::bail!("column mapping entries must not be blank");
            }
            if mapped[i + 1..].contains(a) {
                anyhow::bail!("column {a:?} is mapped to more than one attribute");
            }
        }
        Ok(())
    }

    /// Replace the required tags, e.g. from `--tags`.
    pub fn with_required_tags(mut self, tags: RequiredTags) -> Self {
        self.required_tags = tags;
        self
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new(self.required_tags.clone())
            .with_columns(self.columns.clone())
            .with_duplicates(self.duplicates)
    }
}
