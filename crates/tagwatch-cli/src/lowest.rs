//! # Lowest Subcommand
//!
//! Resources with the fewest required tags, most expensive first among
//! equals. `--below-threshold` keeps only resources under the configured
//! low-compliance threshold.

use anyhow::Result;
use clap::Args;

use tagwatch_metrics::{ComplianceReport, CompletenessThreshold, ResourceScore};

use crate::{money, pct, print_json, Session};

#[derive(Args, Debug)]
pub struct LowestArgs {
    /// Number of resources to list.
    #[arg(long, default_value_t = 5)]
    pub limit: usize,

    /// Only list resources below the low-compliance threshold.
    #[arg(long)]
    pub below_threshold: bool,
}

pub fn select<'r>(
    report: &'r ComplianceReport,
    limit: usize,
    threshold: Option<CompletenessThreshold>,
) -> Vec<&'r ResourceScore> {
    let mut ranked = report.lowest(report.scores.len());
    if let Some(threshold) = threshold {
        ranked.retain(|s| threshold.is_below(s.score));
    }
    ranked.truncate(limit);
    ranked
}

pub fn render(scores: &[&ResourceScore]) -> String {
    let mut out = format!(
        "{:<24} {:<14} {:<16} {:>12} {:>6}  {}\n",
        "Resource", "Service", "Department", "Monthly cost", "Score", "Missing"
    );
    for s in scores {
        out.push_str(&format!(
            "{:<24} {:<14} {:<16} {:>12} {:>6}  {}\n",
            s.resource_id.as_str(),
            s.service,
            s.department,
            money(s.monthly_cost),
            pct(s.score * 100.0),
            s.missing.join(", ")
        ));
    }
    out
}

/// Execute the lowest subcommand.
pub fn run_lowest(args: &LowestArgs, session: &Session) -> Result<u8> {
    let report = session.report()?;
    let threshold = args.below_threshold.then(|| session.engine.threshold());
    let scores = select(&report, args.limit, threshold);
    if session.json {
        print_json(&scores)?;
    } else {
        print!("{}", render(&scores));
    }
    Ok(0)
}
