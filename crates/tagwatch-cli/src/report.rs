//! # Report Subcommand
//!
//! Renders a Markdown FinOps governance report for the selected inventory.
//!
//! ## Sections
//!
//! 1. Executive summary: untagged share, cost visibility gap, annualized
//!    impact, highest-risk department.
//! 2. Department risk table (risk level by unallocated share of cost).
//! 3. Top ten services by cost.
//! 4. Environment distribution with compliance levels.
//! 5. Missing tags.
//! 6. Recommendations, including the three departments with the most
//!    unallocated cost.
//! 7. Data-quality appendix with per-tag field completeness.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use tagwatch_core::{Decimal, Dimension};
use tagwatch_ingest::LoadSummary;
use tagwatch_metrics::{
    worst_group, ComplianceReport, DataQuality, GroupBy, GroupSummary,
};

use crate::{money, pct, Session};

const TOP_SERVICES: usize = 10;
const PRIORITIES: [&str; 3] = ["HIGH", "MEDIUM", "LOW"];

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Write the report to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Inputs to the report, computed once.
#[derive(Debug)]
pub struct ReportData {
    pub report: ComplianceReport,
    pub departments: Vec<GroupSummary>,
    pub services: Vec<GroupSummary>,
    pub environments: Vec<GroupSummary>,
    pub load_summary: LoadSummary,
    pub quality: DataQuality,
    /// Unallocated monthly cost projected over twelve months.
    pub annual_unallocated_cost: Decimal,
}

impl ReportData {
    pub fn collect(session: &Session) -> Result<Self> {
        let report = session.report()?;
        let by = |d| session.engine.breakdown(&session.records, &GroupBy::Dimension(d));
        let quality = DataQuality::assess(session.load_summary.duplication_rate(), &report);
        let annual_unallocated_cost = annualize(report.unallocated_cost)?;
        Ok(Self {
            departments: by(Dimension::Department)?,
            services: by(Dimension::Service)?,
            environments: by(Dimension::Environment)?,
            load_summary: session.load_summary,
            quality,
            annual_unallocated_cost,
            report,
        })
    }
}

fn annualize(monthly: Decimal) -> Result<Decimal> {
    monthly
        .checked_mul(Decimal::from(12))
        .context("annualized unallocated cost overflows")
}

fn field_status(completeness: f64) -> &'static str {
    if completeness >= 80.0 {
        "Good"
    } else if completeness >= 50.0 {
        "Needs Improvement"
    } else {
        "Critical"
    }
}

/// Render the full Markdown report.
pub fn render(data: &ReportData, generated_at: DateTime<Utc>) -> Result<String> {
    let mut md = String::new();
    write_report(&mut md, data, generated_at).context("failed to render report")?;
    Ok(md)
}

fn write_report(md: &mut String, data: &ReportData, generated_at: DateTime<Utc>) -> std::fmt::Result {
    let r = &data.report;

    writeln!(md, "# FinOps Governance Report")?;
    writeln!(md, "## Cloud Resource Tagging Compliance & Cost Analysis")?;
    writeln!(md)?;
    writeln!(md, "---")?;
    writeln!(md)?;

    writeln!(md, "## Executive Summary")?;
    writeln!(md)?;
    writeln!(md, "**Date Generated:** {}", generated_at.format("%B %d, %Y at %H:%M UTC"))?;
    writeln!(md)?;
    writeln!(md, "### Critical Findings")?;
    writeln!(md)?;
    writeln!(
        md,
        "- **{}** of cloud resources are untagged ({} out of {} resources)",
        pct(r.untagged_pct()),
        r.untagged_count,
        r.total_resources
    )?;
    writeln!(
        md,
        "- **{}** in monthly costs cannot be fully allocated ({} of total costs)",
        money(r.unallocated_cost),
        pct(r.unallocated_cost_pct())
    )?;
    match worst_group(&data.departments) {
        Some(dept) => writeln!(
            md,
            "- **{}** department has the highest unallocated cost burden ({}/month)",
            dept.key,
            money(dept.unallocated_cost)
        )?,
        None => writeln!(md, "- No department carries unallocated cost")?,
    }
    writeln!(md)?;
    writeln!(md, "### Financial Impact")?;
    writeln!(md)?;
    writeln!(md, "| Metric | Value | Impact |")?;
    writeln!(md, "|--------|-------|--------|")?;
    writeln!(md, "| Total Monthly Cost | {} | Base cloud spend |", money(r.total_cost))?;
    writeln!(md, "| Untagged Cost | {} | Resources with no required tags |", money(r.untagged_cost))?;
    writeln!(
        md,
        "| Unallocated Cost | {} | Resources missing at least one required tag |",
        money(r.unallocated_cost)
    )?;
    writeln!(
        md,
        "| Cost Visibility Gap | {} | Share of spend without accountability |",
        pct(r.unallocated_cost_pct())
    )?;
    writeln!(
        md,
        "| Estimated Annual Impact | {} | Projected yearly unallocated spend |",
        money(data.annual_unallocated_cost)
    )?;
    writeln!(md)?;
    writeln!(md, "### Governance Status")?;
    writeln!(md)?;
    writeln!(md, "- **Compliance Rate:** {}", pct(r.compliance_pct()))?;
    writeln!(md, "- **Data Quality Score:** {}", pct(data.quality.score))?;
    writeln!(
        md,
        "- **Field Completeness:** {} average across required tags",
        pct(r.average_completeness() * 100.0)
    )?;
    writeln!(md)?;

    writeln!(md, "## Detailed Analysis")?;
    writeln!(md)?;
    writeln!(md, "### Department Breakdown")?;
    writeln!(md)?;
    writeln!(
        md,
        "| Department | Fully Tagged | Not Fully Tagged | Allocated Cost | Unallocated Cost | Risk Level |"
    )?;
    writeln!(md, "|------------|--------------|------------------|----------------|------------------|------------|")?;
    for d in &data.departments {
        writeln!(
            md,
            "| {} | {} | {} | {} | {} | {} |",
            d.key,
            d.fully_tagged_count,
            d.resource_count - d.fully_tagged_count,
            money(d.allocated_cost()),
            money(d.unallocated_cost),
            d.risk_level()
        )?;
    }
    writeln!(md)?;

    writeln!(md, "### Top Cost Services")?;
    writeln!(md)?;
    writeln!(md, "| Service | Monthly Cost | Percentage of Total |")?;
    writeln!(md, "|---------|--------------|---------------------|")?;
    for s in data.services.iter().take(TOP_SERVICES) {
        writeln!(md, "| {} | {} | {} |", s.key, money(s.total_cost), pct(s.share_of_total_pct))?;
    }
    writeln!(md)?;

    writeln!(md, "### Environment Distribution")?;
    writeln!(md)?;
    writeln!(md, "| Environment | Total Resources | Tagged % | Monthly Cost | Compliance Level |")?;
    writeln!(md, "|-------------|-----------------|----------|--------------|------------------|")?;
    for e in &data.environments {
        writeln!(
            md,
            "| {} | {} | {} | {} | {} |",
            e.key,
            e.resource_count,
            pct(e.compliance_pct()),
            money(e.total_cost),
            e.compliance_level()
        )?;
    }
    writeln!(md)?;

    writeln!(md, "### Missing Tags")?;
    writeln!(md)?;
    writeln!(md, "| Tag | Resources Missing | Missing % |")?;
    writeln!(md, "|-----|-------------------|-----------|")?;
    for m in &r.missing_tags {
        writeln!(md, "| {} | {} | {} |", m.tag, m.missing, pct(m.missing_pct))?;
    }
    writeln!(md)?;

    write_recommendations(md, data)?;

    writeln!(md, "## Technical Appendix")?;
    writeln!(md)?;
    writeln!(md, "### Data Quality Assessment")?;
    writeln!(md)?;
    writeln!(md, "- **Total Records Processed:** {}", data.load_summary.original_records)?;
    writeln!(md, "- **Unique Resources:** {}", data.load_summary.unique_resources)?;
    writeln!(md, "- **Duplicate Records:** {}", data.load_summary.duplicate_records)?;
    writeln!(md, "- **Data Quality Score:** {}", pct(data.quality.score))?;
    writeln!(md)?;
    writeln!(md, "### Tag Field Completeness")?;
    writeln!(md)?;
    writeln!(md, "| Tag Field | Completeness | Status |")?;
    writeln!(md, "|-----------|--------------|--------|")?;
    for (tag, completeness) in r.field_completeness() {
        writeln!(md, "| {tag} | {} | {} |", pct(completeness), field_status(completeness))?;
    }
    writeln!(md)?;
    writeln!(md, "### Processing Details")?;
    writeln!(md)?;
    writeln!(md, "- **Report Generated:** {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    writeln!(md, "- **Analysis Period:** Current month snapshot")?;
    writeln!(md, "- **Required Tags:** {}", r.required_tags.keys().join(", "))?;
    Ok(())
}

fn write_recommendations(md: &mut String, data: &ReportData) -> std::fmt::Result {
    let r = &data.report;
    writeln!(md, "## Recommendations for Governance Improvement")?;
    writeln!(md)?;
    writeln!(md, "### Immediate Actions (0-30 days)")?;
    writeln!(md)?;
    writeln!(md, "1. **Implement a \"Tag or Terminate\" policy**")?;
    writeln!(md, "   - Enforce mandatory tagging for new resources")?;
    writeln!(md, "   - Alert on untagged resources")?;
    writeln!(md, "2. **Review cost allocation monthly with department heads**")?;
    writeln!(md)?;
    writeln!(md, "### Short-term Actions (1-3 months)")?;
    writeln!(md)?;
    writeln!(md, "3. **Infrastructure as Code integration**")?;
    writeln!(md, "   - Add tag validation to CI/CD pipelines")?;
    writeln!(md, "   - Block deployments missing required tags")?;
    writeln!(md, "4. **Department-specific remediation**")?;

    let mut ranked: Vec<&GroupSummary> = data
        .departments
        .iter()
        .filter(|d| !d.unallocated_cost.is_zero())
        .collect();
    ranked.sort_by(|a, b| {
        b.unallocated_cost
            .cmp(&a.unallocated_cost)
            .then_with(|| a.key.cmp(&b.key))
    });
    for (dept, priority) in ranked.iter().zip(PRIORITIES) {
        writeln!(
            md,
            "   - **{}** ({priority} priority): address {}/month in unallocated costs",
            dept.key,
            money(dept.unallocated_cost)
        )?;
    }
    if let Some(tag) = r.most_missing_tag() {
        writeln!(
            md,
            "   - Start with **{}**, missing on {} of resources",
            tag.tag,
            pct(tag.missing_pct)
        )?;
    }
    writeln!(md)?;
    writeln!(md, "### Success Metrics")?;
    writeln!(md)?;
    writeln!(md, "Target the following within 6 months:")?;
    writeln!(md, "- **Tagging Compliance:** increase from {} to 95%+", pct(r.compliance_pct()))?;
    writeln!(
        md,
        "- **Cost Visibility:** reduce unallocated costs from {} to under $500/month",
        money(r.unallocated_cost)
    )?;
    writeln!(md, "- **Field Completeness:** 90%+ for every required tag")?;
    writeln!(md)?;
    Ok(())
}

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs, session: &Session) -> Result<u8> {
    let data = ReportData::collect(session)?;
    let markdown = render(&data, Utc::now())?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &markdown)
                .with_context(|| format!("failed to write report: {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = markdown.len(), "wrote governance report");
            println!("Report written to {}", path.display());
        }
        None => print!("{markdown}"),
    }
    Ok(0)
}
