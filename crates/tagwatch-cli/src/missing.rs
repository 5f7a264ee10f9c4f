//! # Missing Subcommand
//!
//! Required tags ranked by how often they are missing, with per-tag field
//! completeness.

use anyhow::Result;
use serde::Serialize;

use tagwatch_metrics::ComplianceReport;

use crate::{pct, print_json, Session};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingTagRow {
    pub tag: String,
    pub missing: usize,
    pub missing_pct: f64,
    pub completeness_pct: f64,
}

/// One row per required tag, most frequently missing first.
pub fn rows(report: &ComplianceReport) -> Vec<MissingTagRow> {
    report
        .missing_tags
        .iter()
        .map(|m| MissingTagRow {
            tag: m.tag.clone(),
            missing: m.missing,
            missing_pct: m.missing_pct,
            completeness_pct: m.present_pct(report.total_resources),
        })
        .collect()
}

pub fn render(rows: &[MissingTagRow]) -> String {
    let mut out = format!(
        "{:<20} {:>8} {:>9} {:>13}\n",
        "Tag", "Missing", "Missing%", "Completeness"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<20} {:>8} {:>9} {:>13}\n",
            r.tag,
            r.missing,
            pct(r.missing_pct),
            pct(r.completeness_pct)
        ));
    }
    out
}

/// Execute the missing subcommand.
pub fn run_missing(session: &Session) -> Result<u8> {
    let report = session.report()?;
    let rows = rows(&report);
    if session.json {
        print_json(&rows)?;
    } else {
        print!("{}", render(&rows));
    }
    Ok(0)
}
