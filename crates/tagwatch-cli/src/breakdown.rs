//! # Breakdown Subcommand
//!
//! Cost and compliance grouped by a dimension or by a tag value:
//!
//! ```bash
//! tagwatch breakdown --by department
//! tagwatch breakdown --tag CreatedBy
//! ```

use anyhow::Result;
use clap::Args;

use tagwatch_core::Dimension;
use tagwatch_metrics::{GroupBy, GroupSummary};

use crate::{money, pct, print_json, Session};

#[derive(Args, Debug)]
pub struct BreakdownArgs {
    /// Dimension to group by (service, region, department, environment).
    #[arg(long, conflicts_with = "tag", required_unless_present = "tag")]
    pub by: Option<Dimension>,

    /// Tag or column whose value to group by, e.g. CreatedBy.
    #[arg(long)]
    pub tag: Option<String>,

    /// Show only the N most expensive groups.
    #[arg(long)]
    pub top: Option<usize>,
}

impl BreakdownArgs {
    pub fn group_by(&self) -> GroupBy {
        match (&self.by, &self.tag) {
            (_, Some(tag)) => GroupBy::Tag(tag.clone()),
            (Some(dimension), None) => GroupBy::Dimension(*dimension),
            (None, None) => GroupBy::Dimension(Dimension::Department),
        }
    }
}

pub fn render(group_by: &GroupBy, groups: &[GroupSummary]) -> String {
    let mut out = format!(
        "{:<24} {:>9} {:>11} {:>14} {:>14} {:>7}  {}\n",
        group_by.label(),
        "Resources",
        "Compliance",
        "Monthly cost",
        "Unallocated",
        "Share",
        "Risk"
    );
    for g in groups {
        out.push_str(&format!(
            "{:<24} {:>9} {:>11} {:>14} {:>14} {:>7}  {}\n",
            g.key,
            g.resource_count,
            pct(g.compliance_pct()),
            money(g.total_cost),
            money(g.unallocated_cost),
            pct(g.share_of_total_pct),
            g.risk_level()
        ));
    }
    out
}

/// Execute the breakdown subcommand.
pub fn run_breakdown(args: &BreakdownArgs, session: &Session) -> Result<u8> {
    let group_by = args.group_by();
    let mut groups = session.engine.breakdown(&session.records, &group_by)?;
    if let Some(top) = args.top {
        groups.truncate(top);
    }
    if session.json {
        print_json(&groups)?;
    } else {
        print!("{}", render(&group_by, &groups));
    }
    Ok(0)
}
