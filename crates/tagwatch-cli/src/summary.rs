//! # Summary Subcommand
//!
//! Headline KPIs for the selected inventory.

use anyhow::Result;
use serde::Serialize;

use tagwatch_core::{Decimal, Dimension};
use tagwatch_metrics::{worst_group, ComplianceReport, GroupBy, GroupSummary};

use crate::{money, pct, print_json, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub total_resources: usize,
    pub fully_tagged: usize,
    pub partially_tagged: usize,
    pub untagged: usize,
    pub compliance_pct: f64,
    pub untagged_pct: f64,
    pub total_cost: Decimal,
    pub untagged_cost: Decimal,
    pub untagged_cost_pct: f64,
    pub unallocated_cost: Decimal,
    pub unallocated_cost_pct: f64,
    pub average_completeness_pct: f64,
    pub low_compliance_threshold: f64,
    pub low_compliance_resources: usize,
    pub most_missing_tag: Option<String>,
    pub highest_risk_department: Option<String>,
}

impl SummaryView {
    pub fn build(report: &ComplianceReport, departments: &[GroupSummary], session: &Session) -> Self {
        let threshold = session.engine.threshold();
        Self {
            total_resources: report.total_resources,
            fully_tagged: report.fully_tagged_count,
            partially_tagged: report.partially_tagged_count,
            untagged: report.untagged_count,
            compliance_pct: report.compliance_pct(),
            untagged_pct: report.untagged_pct(),
            total_cost: report.total_cost,
            untagged_cost: report.untagged_cost,
            untagged_cost_pct: report.untagged_cost_pct(),
            unallocated_cost: report.unallocated_cost,
            unallocated_cost_pct: report.unallocated_cost_pct(),
            average_completeness_pct: report.average_completeness() * 100.0,
            low_compliance_threshold: threshold.value(),
            low_compliance_resources: report.below_threshold(threshold).len(),
            most_missing_tag: report.most_missing_tag().map(|m| m.tag.clone()),
            highest_risk_department: worst_group(departments).map(|g| g.key.clone()),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Tagging compliance summary\n\n");
        out.push_str(&format!("  Resources            {}\n", self.total_resources));
        out.push_str(&format!(
            "  Fully tagged         {} ({})\n",
            self.fully_tagged,
            pct(self.compliance_pct)
        ));
        out.push_str(&format!("  Partially tagged     {}\n", self.partially_tagged));
        out.push_str(&format!(
            "  Untagged             {} ({})\n",
            self.untagged,
            pct(self.untagged_pct)
        ));
        out.push_str(&format!("  Total monthly cost   {}\n", money(self.total_cost)));
        out.push_str(&format!(
            "  Untagged cost        {} ({})\n",
            money(self.untagged_cost),
            pct(self.untagged_cost_pct)
        ));
        out.push_str(&format!(
            "  Unallocated cost     {} ({})\n",
            money(self.unallocated_cost),
            pct(self.unallocated_cost_pct)
        ));
        out.push_str(&format!(
            "  Avg completeness     {}\n",
            pct(self.average_completeness_pct)
        ));
        out.push_str(&format!(
            "  Below {:.0}% complete  {}\n",
            self.low_compliance_threshold * 100.0,
            self.low_compliance_resources
        ));
        if let Some(tag) = &self.most_missing_tag {
            out.push_str(&format!("  Most missing tag     {tag}\n"));
        }
        if let Some(dept) = &self.highest_risk_department {
            out.push_str(&format!("  Highest-risk dept    {dept}\n"));
        }
        out
    }
}

/// Execute the summary subcommand.
pub fn run_summary(session: &Session) -> Result<u8> {
    let report = session.report()?;
    let departments = session
        .engine
        .breakdown(&session.records, &GroupBy::Dimension(Dimension::Department))?;
    let view = SummaryView::build(&report, &departments, session);
    if session.json {
        print_json(&view)?;
    } else {
        print!("{}", view.render());
    }
    Ok(0)
}
