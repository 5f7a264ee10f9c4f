//! # Remediate Subcommand
//!
//! Simulates tag fixes read from a YAML edits file and reports the
//! compliance and cost-visibility gained. The source CSV is never
//! modified; `--out` writes the remediated inventory elsewhere and
//! `--log` records which tags were written.
//!
//! ```yaml
//! i-0abc123:
//!   Owner: alice@example.com
//!   CostCenter: 4410
//! vol-77f1:
//!   Project: ledger
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_yaml::Value;

use tagwatch_ingest::export_path;
use tagwatch_metrics::{RemediationImpact, RemediationLogEntry, TagEdits};

use crate::{money, pct, print_json, Session};

#[derive(Args, Debug)]
pub struct RemediateArgs {
    /// YAML file mapping resource id to tag values.
    #[arg(long)]
    pub edits: PathBuf,

    /// Write the remediated inventory to this CSV file.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Write the remediation log to this CSV file.
    #[arg(long)]
    pub log: Option<PathBuf>,
}

/// Parse an edits document. Scalar values (strings, numbers, booleans)
/// are accepted and stored as text.
pub fn parse_edits(text: &str) -> Result<TagEdits> {
    let raw: BTreeMap<String, BTreeMap<String, Value>> =
        serde_yaml::from_str(text).context("edits must map resource ids to tag/value maps")?;
    let mut edits = TagEdits::new();
    for (resource_id, tags) in raw {
        let mut values = BTreeMap::new();
        for (key, value) in tags {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                _ => bail!("value for {resource_id}.{key} must be a scalar"),
            };
            values.insert(key, text);
        }
        edits.insert(resource_id, values);
    }
    Ok(edits)
}

pub fn load_edits(path: &Path) -> Result<TagEdits> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read edits: {}", path.display()))?;
    parse_edits(&text).with_context(|| format!("invalid edits file: {}", path.display()))
}

/// Write the log as CSV: resource id, tags written (`;`-separated), timestamp.
pub fn write_log(path: &Path, log: &[RemediationLogEntry]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    wtr.write_record(["ResourceID", "TagsWritten", "AppliedAt"])?;
    for entry in log {
        wtr.write_record([
            entry.resource_id.as_str(),
            entry.tags_written.join(";").as_str(),
            entry.applied_at.to_rfc3339().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn render(impact: &RemediationImpact, before_pct: f64, after_pct: f64) -> String {
    let mut out = String::from("Remediation impact\n\n");
    out.push_str(&format!("  Resources remediated     {}\n", impact.resources_remediated));
    out.push_str(&format!(
        "  Compliance               {} -> {} ({:+.1} pts)\n",
        pct(before_pct),
        pct(after_pct),
        impact.compliance_delta_pct
    ));
    out.push_str(&format!(
        "  Untagged resources       {} -> {}\n",
        impact.untagged_before, impact.untagged_after
    ));
    out.push_str(&format!(
        "  Incomplete resources     {} -> {}\n",
        impact.incomplete_before, impact.incomplete_after
    ));
    out.push_str(&format!(
        "  Untagged cost recovered  {}\n",
        money(impact.untagged_cost_recovered)
    ));
    out.push_str(&format!(
        "  Cost visibility gained   {}\n",
        money(impact.unallocated_cost_recovered)
    ));
    out.push_str(&format!("  Progress                 {}\n", pct(impact.progress_pct)));
    out
}

/// Execute the remediate subcommand.
pub fn run_remediate(args: &RemediateArgs, session: &Session) -> Result<u8> {
    let edits = load_edits(&args.edits)?;
    let outcome = session.engine.apply_edits(&session.records, &edits)?;
    let impact = outcome.impact();

    if let Some(path) = &args.out {
        export_path(path, &session.layout, &outcome.records)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.log {
        write_log(path, &outcome.log)?;
        tracing::info!(path = %path.display(), entries = outcome.log.len(), "wrote remediation log");
    }

    if session.json {
        print_json(&serde_json::json!({
            "impact": impact,
            "compliance_before_pct": outcome.before.compliance_pct(),
            "compliance_after_pct": outcome.after.compliance_pct(),
            "log": outcome.log,
        }))?;
    } else {
        print!(
            "{}",
            render(&impact, outcome.before.compliance_pct(), outcome.after.compliance_pct())
        );
    }
    Ok(0)
}
