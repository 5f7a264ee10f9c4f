//! # Matrix Subcommand
//!
//! Compliance percentage across two dimensions, e.g. service by
//! department. Cells with fewer resources than `--min-group` are left
//! blank.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use clap::Args;

use tagwatch_core::Dimension;
use tagwatch_metrics::MatrixCell;

use crate::{pct, print_json, Session};

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Row dimension.
    #[arg(long, default_value = "service")]
    pub rows: Dimension,

    /// Column dimension.
    #[arg(long, default_value = "department")]
    pub cols: Dimension,

    /// Minimum resources per cell. Defaults to the configured value.
    #[arg(long)]
    pub min_group: Option<usize>,
}

/// Render cells as a grid; missing cells print as `-`.
pub fn render(rows: Dimension, cells: &[MatrixCell]) -> String {
    let columns: BTreeSet<&str> = cells.iter().map(|c| c.column.as_str()).collect();
    let mut grid: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for c in cells {
        grid.entry(c.row.as_str())
            .or_default()
            .insert(c.column.as_str(), c.compliance_pct);
    }

    let mut out = format!("{:<20}", rows.label());
    for col in &columns {
        out.push_str(&format!(" {col:>12}"));
    }
    out.push('\n');
    for (row, values) in &grid {
        out.push_str(&format!("{row:<20}"));
        for col in &columns {
            let cell = values.get(col).map(|v| pct(*v)).unwrap_or_else(|| "-".into());
            out.push_str(&format!(" {cell:>12}"));
        }
        out.push('\n');
    }
    out
}

/// Execute the matrix subcommand.
pub fn run_matrix(args: &MatrixArgs, session: &Session) -> Result<u8> {
    let min_group = args.min_group.unwrap_or(session.config.matrix_min_group);
    let cells = session
        .engine
        .matrix(&session.records, args.rows, args.cols, min_group)?;
    if session.json {
        print_json(&cells)?;
    } else if cells.is_empty() {
        println!("No {} x {} cells with at least {min_group} resources.", args.rows, args.cols);
    } else {
        print!("{}", render(args.rows, &cells));
    }
    Ok(0)
}
