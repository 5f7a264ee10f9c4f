//! # Validate Subcommand
//!
//! Loads the inventory (which performs every schema check) and reports
//! row accounting, the data-quality score, and the values each filter flag
//! accepts.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use tagwatch_core::Dimension;
use tagwatch_ingest::LoadSummary;
use tagwatch_metrics::DataQuality;

use crate::{pct, print_json, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationView {
    #[serde(flatten)]
    pub load: LoadSummary,
    pub duplication_pct: f64,
    pub quality: DataQuality,
    pub required_tags: Vec<String>,
    pub filter_choices: BTreeMap<Dimension, Vec<String>>,
}

impl ValidationView {
    pub fn build(session: &Session) -> Result<Self> {
        let report = session.report()?;
        Ok(Self {
            load: session.load_summary,
            duplication_pct: session.load_summary.duplication_rate(),
            quality: DataQuality::assess(session.load_summary.duplication_rate(), &report),
            required_tags: session.engine.required_tags().keys().to_vec(),
            filter_choices: session.filter_choices.clone(),
        })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Inventory is valid\n\n");
        out.push_str(&format!("  Rows read            {}\n", self.load.original_records));
        out.push_str(&format!("  Duplicate rows       {}\n", self.load.duplicate_records));
        out.push_str(&format!("  Unique resources     {}\n", self.load.unique_resources));
        out.push_str(&format!("  Duplication rate     {}\n", pct(self.duplication_pct)));
        out.push_str(&format!("  Data quality score   {}\n", pct(self.quality.score)));
        out.push_str(&format!("  Required tags        {}\n", self.required_tags.join(", ")));
        out.push_str("\nFilter values\n\n");
        for (dimension, values) in &self.filter_choices {
            out.push_str(&format!("  {:<20} {}\n", dimension.label(), values.join(", ")));
        }
        out
    }
}

/// Execute the validate subcommand.
pub fn run_validate(session: &Session) -> Result<u8> {
    let view = ValidationView::build(session)?;
    if session.json {
        print_json(&view)?;
    } else {
        print!("{}", view.render());
    }
    Ok(0)
}
