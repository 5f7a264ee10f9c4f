//! # tagwatch CLI entry point
//!
//! Parses command-line arguments, loads the inventory once, and dispatches
//! to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tagwatch_cli::breakdown::{run_breakdown, BreakdownArgs};
use tagwatch_cli::lowest::{run_lowest, LowestArgs};
use tagwatch_cli::matrix::{run_matrix, MatrixArgs};
use tagwatch_cli::missing::run_missing;
use tagwatch_cli::remediate::{run_remediate, RemediateArgs};
use tagwatch_cli::report::{run_report, ReportArgs};
use tagwatch_cli::summary::run_summary;
use tagwatch_cli::untagged::{run_untagged, UntaggedArgs};
use tagwatch_cli::validate::run_validate;
use tagwatch_cli::{error_kind, DataArgs, Session};

/// tagwatch: cloud tagging compliance and cost governance.
///
/// Measures how completely cloud resources carry the required tags, how
/// much spend cannot be attributed because of it, and what fixing the tags
/// would recover.
#[derive(Parser, Debug)]
#[command(name = "tagwatch", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Headline compliance and cost KPIs.
    Summary,

    /// Cost and compliance grouped by a dimension or tag value.
    Breakdown(BreakdownArgs),

    /// Required tags ranked by how often they are missing.
    Missing,

    /// Least completely tagged resources.
    Lowest(LowestArgs),

    /// Untagged resources, with optional CSV export.
    Untagged(UntaggedArgs),

    /// Compliance grid across two dimensions.
    Matrix(MatrixArgs),

    /// Simulate tag fixes and report the before/after impact.
    Remediate(RemediateArgs),

    /// Markdown governance report.
    Report(ReportArgs),

    /// Load the inventory and report data quality.
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("tagwatch v{} starting", env!("CARGO_PKG_VERSION"));

    let result = Session::open(cli.config.as_deref(), &cli.data).and_then(|session| {
        match &cli.command {
            Commands::Summary => run_summary(&session),
            Commands::Breakdown(args) => run_breakdown(args, &session),
            Commands::Missing => run_missing(&session),
            Commands::Lowest(args) => run_lowest(args, &session),
            Commands::Untagged(args) => run_untagged(args, &session),
            Commands::Matrix(args) => run_matrix(args, &session),
            Commands::Remediate(args) => run_remediate(args, &session),
            Commands::Report(args) => run_report(args, &session),
            Commands::Validate => run_validate(&session),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!(kind = error_kind(&e), "{e:#}");
            ExitCode::from(1)
        }
    }
}
