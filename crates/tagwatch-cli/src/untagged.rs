//! # Untagged Subcommand
//!
//! Lists resources carrying none of the required tags, most expensive
//! first, and optionally exports them in the source file's schema for
//! remediation work.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use tagwatch_core::{Decimal, ResourceRecord};
use tagwatch_ingest::export_path;
use tagwatch_metrics::{ComplianceReport, ResourceScore, TagStatus};

use crate::{money, print_json, Session};

#[derive(Args, Debug)]
pub struct UntaggedArgs {
    /// Write the listed resources to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also list partially tagged resources.
    #[arg(long)]
    pub include_partial: bool,
}

#[derive(Debug, Serialize)]
pub struct UntaggedView<'r> {
    pub count: usize,
    pub total_cost: Decimal,
    pub resources: Vec<&'r ResourceScore>,
}

/// Untagged (and optionally partial) resources, most expensive first.
pub fn select(report: &ComplianceReport, include_partial: bool) -> UntaggedView<'_> {
    let mut resources = report.with_status(TagStatus::Untagged);
    if include_partial {
        resources.extend(report.with_status(TagStatus::Partial));
        resources.sort_by(|a, b| {
            b.monthly_cost
                .cmp(&a.monthly_cost)
                .then_with(|| a.resource_id.cmp(&b.resource_id))
        });
    }
    UntaggedView {
        count: resources.len(),
        total_cost: if include_partial {
            report.unallocated_cost
        } else {
            report.untagged_cost
        },
        resources,
    }
}

/// The records behind `view`, in the order listed.
pub fn records_for(view: &UntaggedView<'_>, records: &[ResourceRecord]) -> Vec<ResourceRecord> {
    view.resources
        .iter()
        .filter_map(|s| records.iter().find(|r| r.resource_id == s.resource_id))
        .cloned()
        .collect()
}

pub fn render(view: &UntaggedView<'_>) -> String {
    let mut out = format!(
        "{} resources, {} per month\n\n",
        view.count,
        money(view.total_cost)
    );
    for s in &view.resources {
        out.push_str(&format!(
            "{:<24} {:<14} {:<16} {:>12}\n",
            s.resource_id.as_str(),
            s.service,
            s.department,
            money(s.monthly_cost)
        ));
    }
    out
}

/// Execute the untagged subcommand.
pub fn run_untagged(args: &UntaggedArgs, session: &Session) -> Result<u8> {
    let report = session.report()?;
    let view = select(&report, args.include_partial);

    if let Some(path) = &args.out {
        let records = records_for(&view, &session.records);
        export_path(path, &session.layout, &records)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), resources = records.len(), "exported untagged resources");
    }

    if session.json {
        print_json(&view)?;
    } else {
        print!("{}", render(&view));
    }
    Ok(0)
}
