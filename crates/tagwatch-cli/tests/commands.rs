//! # Subcommand Tests Against Real Files
//!
//! Each test writes an inventory (and, where needed, a config or edits
//! file) into a temporary directory, opens a [`Session`] the way the
//! binary does, and checks what the subcommand computes or writes.

use std::fs;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tagwatch_cli::breakdown::{render as render_breakdown, BreakdownArgs};
use tagwatch_cli::lowest::select as select_lowest;
use tagwatch_cli::missing::rows as missing_rows;
use tagwatch_cli::remediate::{run_remediate, RemediateArgs};
use tagwatch_cli::report::{render as render_report, ReportData};
use tagwatch_cli::summary::SummaryView;
use tagwatch_cli::untagged::{run_untagged, select as select_untagged, UntaggedArgs};
use tagwatch_cli::validate::ValidationView;
use tagwatch_cli::{DataArgs, Session};
use tagwatch_core::{Decimal, Dimension};
use tagwatch_metrics::GroupBy;

const INVENTORY: &str = "\
ResourceID,Service,Region,Department,Environment,MonthlyCostUSD,Owner,Project,CostCenter,CreatedBy
r-001,EC2,us-east-1,Finance,Prod,400.00,alice,ledger,CC1,Terraform
r-002,EC2,us-east-1,Finance,Dev,100.00,,,,Manual
r-003,S3,eu-west-1,Sales,Prod,50.00,bob,,,Manual
r-004,RDS,eu-west-1,Sales,Prod,250.00,,,,
r-005,S3,us-east-1,Marketing,Test,200.00,carol,crm,CC7,Terraform
r-005,S3,us-east-1,Marketing,Test,999.00,dup,dup,dup,Manual
";

const CONFIG: &str = "required_tags: [Owner, Project, CostCenter]\nlow_compliance_threshold: 0.5\n";

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("inventory.csv"), INVENTORY).unwrap();
        fs::write(dir.path().join("tagwatch.yaml"), CONFIG).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self) -> DataArgs {
        DataArgs {
            data: self.path("inventory.csv"),
            ..DataArgs::default()
        }
    }

    fn session(&self, args: &DataArgs) -> Session {
        Session::open(Some(&self.path("tagwatch.yaml")), args).unwrap()
    }
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn session_drops_duplicates_and_uses_config_tags() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    assert_eq!(session.records.len(), 5);
    assert_eq!(session.load_summary.original_records, 6);
    assert_eq!(session.load_summary.duplicate_records, 1);
    assert_eq!(session.engine.required_tags().len(), 3);
}

#[test]
fn tags_flag_overrides_config() {
    let fx = Fixture::new();
    let args = DataArgs {
        tags: vec!["Owner".into()],
        ..fx.args()
    };
    let session = fx.session(&args);
    assert_eq!(session.engine.required_tags().keys(), ["Owner"]);
    assert_eq!(session.report().unwrap().fully_tagged_count, 3);
}

#[test]
fn missing_data_file_is_error() {
    let fx = Fixture::new();
    let args = DataArgs {
        data: fx.path("absent.csv"),
        ..DataArgs::default()
    };
    let err = Session::open(None, &args).unwrap_err();
    assert!(format!("{err:#}").contains("failed to load inventory"));
}

#[test]
fn missing_required_column_is_error() {
    let fx = Fixture::new();
    let args = DataArgs {
        tags: vec!["Owner".into(), "Team".into()],
        ..fx.args()
    };
    let err = Session::open(None, &args).unwrap_err();
    assert!(format!("{err:#}").contains("Team"));
}

#[test]
fn summary_kpis() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let report = session.report().unwrap();
    let departments = session
        .engine
        .breakdown(&session.records, &GroupBy::Dimension(Dimension::Department))
        .unwrap();
    let view = SummaryView::build(&report, &departments, &session);

    assert_eq!(view.total_resources, 5);
    assert_eq!(view.fully_tagged, 2);
    assert_eq!(view.partially_tagged, 1);
    assert_eq!(view.untagged, 2);
    assert_eq!(view.compliance_pct, 40.0);
    assert_eq!(view.total_cost, Decimal::from(1000));
    assert_eq!(view.untagged_cost, Decimal::from(350));
    assert_eq!(view.unallocated_cost, Decimal::from(400));
    assert_eq!(view.low_compliance_resources, 3);
    assert_eq!(view.highest_risk_department.as_deref(), Some("Sales"));
    assert!(view.render().contains("$1,000.00"));
}

#[test]
fn department_filter_narrows_selection() {
    let fx = Fixture::new();
    let args = DataArgs {
        department: vec!["Finance".into()],
        ..fx.args()
    };
    let session = fx.session(&args);
    let report = session.report().unwrap();
    assert_eq!(report.total_resources, 2);
    // Choices still list every department in the file.
    assert_eq!(
        session.filter_choices[&Dimension::Department],
        vec!["Finance", "Marketing", "Sales"]
    );
    assert_eq!(report.total_cost, Decimal::from(500));
}

#[test]
fn unmatched_filter_gives_zero_report() {
    let fx = Fixture::new();
    let args = DataArgs {
        department: vec!["Legal".into()],
        ..fx.args()
    };
    let report = fx.session(&args).report().unwrap();
    assert_eq!(report.total_resources, 0);
    assert_eq!(report.compliance_pct(), 0.0);
}

#[test]
fn breakdown_by_created_by_tag() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let args = BreakdownArgs {
        by: None,
        tag: Some("CreatedBy".into()),
        top: None,
    };
    let group_by = args.group_by();
    let groups = session.engine.breakdown(&session.records, &group_by).unwrap();
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["Terraform", "(missing)", "Manual"]);
    let text = render_breakdown(&group_by, &groups);
    assert!(text.starts_with("CreatedBy"));
    assert!(text.contains("HIGH"));
}

#[test]
fn missing_rows_ranked() {
    let fx = Fixture::new();
    let report = fx.session(&fx.args()).report().unwrap();
    let rows = missing_rows(&report);
    let tags: Vec<&str> = rows.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["CostCenter", "Project", "Owner"]);
    assert_eq!(rows[0].missing, 3);
    assert_eq!(rows[2].completeness_pct, 60.0);
}

#[test]
fn lowest_respects_threshold() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let report = session.report().unwrap();

    let ids = |scores: Vec<&tagwatch_metrics::ResourceScore>| -> Vec<String> {
        scores.iter().map(|s| s.resource_id.to_string()).collect()
    };
    assert_eq!(ids(select_lowest(&report, 2, None)), vec!["r-004", "r-002"]);
    assert_eq!(
        ids(select_lowest(&report, 10, Some(session.engine.threshold()))),
        vec!["r-004", "r-002", "r-003"]
    );
}

#[test]
fn untagged_export_keeps_schema() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let out = fx.path("untagged.csv");
    let args = UntaggedArgs {
        out: Some(out.clone()),
        include_partial: false,
    };
    assert_eq!(run_untagged(&args, &session).unwrap(), 0);

    let text = read(&out);
    let mut lines = text.lines();
    assert_eq!(lines.next(), INVENTORY.lines().next());
    assert!(lines.next().unwrap().starts_with("r-004,RDS"));
    assert!(lines.next().unwrap().starts_with("r-002,EC2"));
    assert!(lines.next().is_none());

    let report = session.report().unwrap();
    let with_partial = select_untagged(&report, true);
    assert_eq!(with_partial.count, 3);
    assert_eq!(with_partial.total_cost, Decimal::from(400));
    assert_eq!(select_untagged(&report, false).total_cost, Decimal::from(350));
}

#[test]
fn remediate_writes_outputs() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    fs::write(
        fx.path("edits.yaml"),
        "r-004:\n  Owner: dana\n  Project: billing\n  CostCenter: 4410\n",
    )
    .unwrap();
    let args = RemediateArgs {
        edits: fx.path("edits.yaml"),
        out: Some(fx.path("fixed.csv")),
        log: Some(fx.path("log.csv")),
    };
    assert_eq!(run_remediate(&args, &session).unwrap(), 0);

    let fixed = read(&fx.path("fixed.csv"));
    assert!(fixed.contains("r-004,RDS,eu-west-1,Sales,Prod,250.00,dana,billing,4410,"));
    let log = read(&fx.path("log.csv"));
    assert!(log.lines().nth(1).unwrap().starts_with("r-004,CostCenter;Owner;Project,"));

    // The source file is untouched.
    assert_eq!(read(&fx.path("inventory.csv")), INVENTORY);
}

#[test]
fn remediate_unknown_resource_fails() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    fs::write(fx.path("edits.yaml"), "r-999:\n  Owner: x\n").unwrap();
    let args = RemediateArgs {
        edits: fx.path("edits.yaml"),
        out: None,
        log: None,
    };
    let err = run_remediate(&args, &session).unwrap_err();
    assert!(format!("{err:#}").contains("r-999"));
}

#[test]
fn report_has_every_section() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let data = ReportData::collect(&session).unwrap();
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
    let md = render_report(&data, at).unwrap();

    for heading in [
        "# FinOps Governance Report",
        "## Executive Summary",
        "### Department Breakdown",
        "### Top Cost Services",
        "### Environment Distribution",
        "### Missing Tags",
        "## Recommendations for Governance Improvement",
        "## Technical Appendix",
    ] {
        assert!(md.contains(heading), "missing section {heading}");
    }
    assert!(md.contains("March 01, 2026"));
    assert!(md.contains("| Sales | 0 | 2 | $0.00 | $300.00 | HIGH |"));
    assert!(md.contains("**Sales** (HIGH priority)"));
    assert!(md.contains("**Finance** (MEDIUM priority)"));
    assert!(md.contains("- **Duplicate Records:** 1"));
    assert!(md.contains("| Estimated Annual Impact | $4,800.00 |"));
}

#[test]
fn validation_view_scores_quality() {
    let fx = Fixture::new();
    let session = fx.session(&fx.args());
    let view = ValidationView::build(&session).unwrap();
    let expected = (100.0 - 100.0 / 6.0) * 0.7 + 40.0 * 0.3;
    assert!((view.quality.score - expected).abs() < 1e-9);
    assert_eq!(view.required_tags, vec!["Owner", "Project", "CostCenter"]);
    assert_eq!(view.filter_choices[&Dimension::Service], vec!["EC2", "RDS", "S3"]);
    assert!(view.render().contains("Marketing, Sales"));
}
