//! # tagwatch-cli: Tagging Compliance from the Command Line
//!
//! Provides the `tagwatch` binary. Every invocation loads one inventory
//! CSV, applies the dimension filters given on the command line, computes
//! what the subcommand asks for, and prints text or JSON.
//!
//! ## Subcommands
//!
//! - `tagwatch summary`: headline KPIs.
//! - `tagwatch breakdown --by department`: grouped costs and risk levels.
//! - `tagwatch missing`: most frequently missing tags.
//! - `tagwatch lowest --limit 5`: least complete resources.
//! - `tagwatch untagged --out untagged.csv`: untagged resources, with export.
//! - `tagwatch matrix --rows service --cols department`: compliance grid.
//! - `tagwatch remediate --edits fixes.yaml`: before/after simulation.
//! - `tagwatch report --out report.md`: Markdown governance report.
//! - `tagwatch validate`: load summary and data-quality score.
//!
//! ```bash
//! tagwatch --data inventory.csv --department Finance --department Sales summary
//! tagwatch --tags Owner,Project,CostCenter --json missing
//! ```

pub mod breakdown;
pub mod config;
pub mod lowest;
pub mod matrix;
pub mod missing;
pub mod remediate;
pub mod report;
pub mod summary;
pub mod untagged;
pub mod validate;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tagwatch_core::{Decimal, Dimension, RequiredTags, ResourceRecord, TagwatchError};
use tagwatch_ingest::{CsvLayout, DatasetCache, LoadSummary};
use tagwatch_metrics::{distinct_values, ComplianceEngine, ComplianceReport, RecordFilter};

use crate::config::TagwatchConfig;

/// Inventory used when `--data` is not given.
pub const DEFAULT_DATA_PATH: &str = "data/inventory.csv";

/// Data selection flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Inventory CSV to analyse.
    #[arg(long, global = true, default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Required tag keys, comma separated. Overrides the config file.
    #[arg(long, global = true, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Keep only these services. Repeatable.
    #[arg(long, global = true)]
    pub service: Vec<String>,

    /// Keep only these regions. Repeatable.
    #[arg(long, global = true)]
    pub region: Vec<String>,

    /// Keep only these departments. Repeatable.
    #[arg(long, global = true)]
    pub department: Vec<String>,

    /// Keep only these environments. Repeatable.
    #[arg(long, global = true)]
    pub environment: Vec<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,
}

impl DataArgs {
    /// The `--tags` override, if given.
    pub fn required_tags(&self) -> Result<Option<RequiredTags>> {
        if self.tags.is_empty() {
            return Ok(None);
        }
        let tags = RequiredTags::new(self.tags.iter().map(String::as_str))
            .context("invalid --tags")?;
        Ok(Some(tags))
    }

    pub fn filter(&self) -> RecordFilter {
        RecordFilter::all()
            .select(Dimension::Service, self.service.iter().cloned())
            .select(Dimension::Region, self.region.iter().cloned())
            .select(Dimension::Department, self.department.iter().cloned())
            .select(Dimension::Environment, self.environment.iter().cloned())
    }
}

/// Everything a subcommand works from: configuration, the loaded and
/// filtered inventory, and an engine bound to the tag policy.
#[derive(Debug)]
pub struct Session {
    pub config: TagwatchConfig,
    pub engine: ComplianceEngine,
    pub layout: CsvLayout,
    pub load_summary: LoadSummary,
    /// Records passing the command-line filters, in file order.
    pub records: Vec<ResourceRecord>,
    /// Values each filter flag can take, from the unfiltered inventory.
    pub filter_choices: BTreeMap<Dimension, Vec<String>>,
    pub json: bool,
}

impl Session {
    pub fn open(config_path: Option<&Path>, args: &DataArgs) -> Result<Self> {
        let mut config = TagwatchConfig::load(config_path)?;
        if let Some(tags) = args.required_tags()? {
            config = config.with_required_tags(tags);
        }

        let dataset = DatasetCache::new(&args.data, config.load_options())
            .into_dataset()
            .with_context(|| format!("failed to load inventory: {}", args.data.display()))?;

        let filter_choices = Dimension::all()
            .iter()
            .map(|&d| (d, distinct_values(&dataset.records, d)))
            .collect();
        let filter = args.filter();
        let records = if filter.is_unrestricted() {
            dataset.records
        } else {
            filter.apply(&dataset.records)
        };
        tracing::info!(
            loaded = dataset.summary.unique_resources,
            selected = records.len(),
            "inventory ready"
        );

        let engine = ComplianceEngine::new(config.required_tags.clone())
            .with_threshold(config.low_compliance_threshold);
        Ok(Self {
            config,
            engine,
            layout: dataset.layout,
            load_summary: dataset.summary,
            records,
            filter_choices,
            json: args.json,
        })
    }

    pub fn report(&self) -> Result<ComplianceReport> {
        Ok(self.engine.compute(&self.records)?)
    }
}

/// Stable kind of the first [`TagwatchError`] in `err`'s chain, or
/// `"error"` when the failure did not come from the tagwatch crates.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<TagwatchError>())
        .map_or("error", TagwatchError::kind)
}

/// Pretty-print `value` as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `$1,234.50`-style rendering of an amount.
pub fn money(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac}")
}

/// One-decimal percentage.
pub fn pct(value: f64) -> String {
    format!("{value:.1}%")
}
