//! Invariants of the metric functions over generated record collections.

use proptest::prelude::*;
use tagwatch_core::{Decimal, Dimension, RequiredTags, ResourceId, ResourceRecord};
use tagwatch_metrics::{
    apply_edits, breakdown, compute, GroupBy, RecordFilter, TagEdits, TagStatus,
};

const TAG_KEYS: [&str; 3] = ["Owner", "Project", "CostCenter"];
const DEPARTMENTS: [&str; 4] = ["Finance", "Sales", "Ops", ""];

fn required_tags() -> RequiredTags {
    RequiredTags::new(TAG_KEYS).unwrap()
}

fn record_strategy() -> impl Strategy<Value = (usize, i64, [Option<bool>; 3])> {
    (
        0..DEPARTMENTS.len(),
        0i64..1_000_000,
        proptest::array::uniform3(proptest::option::of(any::<bool>())),
    )
}

/// `None` leaves the tag absent, `Some(false)` stores a blank value,
/// `Some(true)` stores a real value.
fn records_strategy() -> impl Strategy<Value = Vec<ResourceRecord>> {
    proptest::collection::vec(record_strategy(), 0..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (dept, cents, tags))| {
                let mut record = ResourceRecord::new(
                    ResourceId::new(format!("res-{i}")).unwrap(),
                    Decimal::new(cents, 2),
                )
                .with_dimension(Dimension::Department, DEPARTMENTS[dept]);
                for (key, state) in TAG_KEYS.iter().zip(tags) {
                    match state {
                        Some(true) => record.set_tag(*key, "value"),
                        Some(false) => record.set_tag(*key, " "),
                        None => {}
                    }
                }
                record
            })
            .collect()
    })
}

proptest! {
    /// Every completeness score lies in [0, 1] and agrees with its status.
    #[test]
    fn scores_are_unit_interval(records in records_strategy()) {
        let report = compute(&records, &required_tags()).unwrap();
        for s in &report.scores {
            prop_assert!((0.0..=1.0).contains(&s.score));
            match s.status {
                TagStatus::Untagged => prop_assert_eq!(s.score, 0.0),
                TagStatus::FullyTagged => prop_assert_eq!(s.score, 1.0),
                TagStatus::Partial => prop_assert!(s.score > 0.0 && s.score < 1.0),
            }
        }
    }

    /// Department groups partition the collection exactly.
    #[test]
    fn department_totals_sum_to_collection(records in records_strategy()) {
        let tags = required_tags();
        let report = compute(&records, &tags).unwrap();
        let groups = breakdown(&records, &tags, &GroupBy::Dimension(Dimension::Department)).unwrap();
        let cost: Decimal = groups.iter().map(|g| g.total_cost).sum();
        let count: usize = groups.iter().map(|g| g.resource_count).sum();
        let unallocated: Decimal = groups.iter().map(|g| g.unallocated_cost).sum();
        prop_assert_eq!(cost, report.total_cost);
        prop_assert_eq!(count, report.total_resources);
        prop_assert_eq!(unallocated, report.unallocated_cost);
    }

    /// untagged cost <= unallocated cost <= total cost.
    #[test]
    fn cost_ordering(records in records_strategy()) {
        let report = compute(&records, &required_tags()).unwrap();
        prop_assert!(report.untagged_cost <= report.unallocated_cost);
        prop_assert!(report.unallocated_cost <= report.total_cost);
        prop_assert_eq!(
            report.fully_tagged_count + report.partially_tagged_count + report.untagged_count,
            report.total_resources
        );
    }

    /// Remediation works on a copy.
    #[test]
    fn apply_edits_does_not_mutate_input(records in records_strategy()) {
        let snapshot = records.clone();
        let mut edits = TagEdits::new();
        for r in records.iter().step_by(2) {
            edits.entry(r.resource_id.to_string())
                .or_default()
                .insert("Owner".to_string(), "fixed".to_string());
        }
        let outcome = apply_edits(&records, &required_tags(), &edits).unwrap();
        prop_assert_eq!(&records, &snapshot);
        prop_assert!(outcome.after.untagged_count <= outcome.before.untagged_count);
        prop_assert!(outcome.after.fully_tagged_count >= outcome.before.fully_tagged_count);
    }

    /// A filter that matches nothing yields an all-zero report.
    #[test]
    fn unmatched_filter_is_zero_report(records in records_strategy()) {
        let filter = RecordFilter::all().select(Dimension::Department, ["Legal"]);
        let report = compute(&filter.apply(&records), &required_tags()).unwrap();
        prop_assert_eq!(report.total_resources, 0);
        prop_assert_eq!(report.total_cost, Decimal::ZERO);
        prop_assert_eq!(report.compliance_pct(), 0.0);
        prop_assert_eq!(report.untagged_cost_pct(), 0.0);
    }
}

#[test]
fn empty_collection_reports_zero() {
    let report = compute(&[], &required_tags()).unwrap();
    assert_eq!(report.total_resources, 0);
    assert_eq!(report.untagged_cost, Decimal::ZERO);
    assert_eq!(report.compliance_pct(), 0.0);
    assert!(breakdown(&[], &required_tags(), &GroupBy::Tag("Owner".into()))
        .unwrap()
        .is_empty());
}
