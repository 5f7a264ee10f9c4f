//! # CSV Loader
//!
//! Parses an inventory CSV into a [`Dataset`].
//!
//! ## Rules
//!
//! - Every mapped column and every required tag column must be present in
//!   the header; otherwise the load fails with a schema error listing all
//!   missing columns.
//! - Cells are trimmed. A blank dimension becomes `Unknown`; a blank tag is
//!   a missing tag; a blank cost counts as zero.
//! - Non-numeric cost is a schema error. A negative cost, or one above
//!   [`MAX_MONTHLY_COST`](tagwatch_core::MAX_MONTHLY_COST), is invalid
//!   input. Both name the offending line.
//! - Some exports quote each whole line (`"id,svc,..."`). When the header
//!   parses as a single column containing commas, the outer quotes are
//!   stripped from every line and the text is parsed again.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use tagwatch_core::{check_cost, Dimension, ResourceId, ResourceRecord, TagwatchError};

use crate::columns::{DuplicatePolicy, LoadOptions};
use crate::export::CsvLayout;

/// A loaded inventory: records plus what is needed to write them back out.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Header order and column mapping of the source file.
    pub layout: CsvLayout,
    /// Records in file order, one per resource identifier.
    pub records: Vec<ResourceRecord>,
    /// Row and duplicate counts from the load.
    pub summary: LoadSummary,
}

/// Row accounting for a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Data rows read from the file.
    pub original_records: usize,
    /// Rows whose resource identifier had already been seen.
    pub duplicate_records: usize,
    /// Records kept.
    pub unique_resources: usize,
    /// Whether duplicate rows were dropped.
    pub duplicates_removed: bool,
}

impl LoadSummary {
    /// Duplicate rows as a percentage of all rows; 0 for an empty file.
    pub fn duplication_rate(&self) -> f64 {
        if self.original_records == 0 {
            0.0
        } else {
            self.duplicate_records as f64 / self.original_records as f64 * 100.0
        }
    }
}

/// Load a dataset from a file.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<Dataset, TagwatchError> {
    let text = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read inventory file");
    load_str(&text, options)
}

/// Load a dataset from CSV text.
pub fn load_str(text: &str, options: &LoadOptions) -> Result<Dataset, TagwatchError> {
    let headers = read_headers(text)?;
    if is_line_quoted(&headers) {
        tracing::info!("header parsed as one quoted column; unwrapping quoted lines");
        let unwrapped = unwrap_quoted_lines(text);
        return parse(&unwrapped, options);
    }
    parse(text, options)
}

fn reader(text: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes())
}

fn read_headers(text: &str) -> Result<Vec<String>, TagwatchError> {
    let mut rdr = reader(text);
    let headers = rdr
        .headers()
        .map_err(|e| TagwatchError::Schema(format!("unreadable header: {e}")))?;
    Ok(headers.iter().map(str::to_string).collect())
}

fn is_line_quoted(headers: &[String]) -> bool {
    headers.len() == 1 && headers[0].contains(',')
}

fn unwrap_quoted_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix('"').unwrap_or(line);
            line.strip_suffix('"').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse(text: &str, options: &LoadOptions) -> Result<Dataset, TagwatchError> {
    let mut rdr = reader(text);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| TagwatchError::Schema(format!("unreadable header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let missing: Vec<&str> = options
        .columns
        .required_columns(&options.required_tags)
        .into_iter()
        .filter(|c| !index.contains_key(c))
        .collect();
    if !missing.is_empty() {
        return Err(TagwatchError::Schema(format!(
            "missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = Vec::new();
    let mut seen: HashSet<ResourceId> = HashSet::new();
    let mut original_records = 0usize;
    let mut duplicate_records = 0usize;

    for (idx, row) in rdr.records().enumerate() {
        let line = idx + 2;
        let row = row.map_err(|e| TagwatchError::Schema(format!("line {line}: {e}")))?;
        original_records += 1;

        let record = parse_row(&row, &headers, options, line)?;
        if !seen.insert(record.resource_id.clone()) {
            duplicate_records += 1;
            match options.duplicates {
                DuplicatePolicy::KeepFirst => {
                    tracing::warn!(
                        resource_id = %record.resource_id,
                        line,
                        "dropping duplicate resource row"
                    );
                    continue;
                }
                DuplicatePolicy::Reject => {
                    return Err(TagwatchError::Schema(format!(
                        "line {line}: duplicate resource identifier {}",
                        record.resource_id
                    )));
                }
            }
        }
        records.push(record);
    }

    let summary = LoadSummary {
        original_records,
        duplicate_records,
        unique_resources: records.len(),
        duplicates_removed: options.duplicates == DuplicatePolicy::KeepFirst,
    };
    tracing::info!(
        rows = summary.original_records,
        duplicates = summary.duplicate_records,
        resources = summary.unique_resources,
        "loaded inventory"
    );

    Ok(Dataset {
        layout: CsvLayout {
            headers,
            columns: options.columns.clone(),
            required_tags: options.required_tags.clone(),
        },
        records,
        summary,
    })
}

fn parse_row(
    row: &csv::StringRecord,
    headers: &[String],
    options: &LoadOptions,
    line: usize,
) -> Result<ResourceRecord, TagwatchError> {
    let columns = &options.columns;
    let mut resource_id = None;
    let mut cost_cell = "";
    let mut dimensions: Vec<(Dimension, &str)> = Vec::new();
    let mut tags = BTreeMap::new();
    let mut extra = BTreeMap::new();

    for (header, value) in headers.iter().zip(row.iter()) {
        let mut mapped = false;
        if *header == columns.resource_id {
            resource_id = Some(value);
            mapped = true;
        }
        if *header == columns.monthly_cost {
            cost_cell = value;
            mapped = true;
        }
        if let Some(dimension) = columns.dimension_of(header) {
            dimensions.push((dimension, value));
            mapped = true;
        }
        if options.required_tags.contains(header) {
            tags.insert(header.clone(), value.to_string());
            mapped = true;
        }
        if !mapped {
            extra.insert(header.clone(), value.to_string());
        }
    }

    let resource_id = ResourceId::new(resource_id.unwrap_or_default())
        .map_err(|e| TagwatchError::Schema(format!("line {line}: {e}")))?;
    let monthly_cost = parse_cost(cost_cell, &resource_id, line)?;

    let mut record = ResourceRecord::new(resource_id, monthly_cost);
    for (dimension, value) in dimensions {
        record.set_dimension(dimension, value);
    }
    record.tags = tags;
    record.extra = extra;
    Ok(record)
}

fn parse_cost(cell: &str, resource_id: &ResourceId, line: usize) -> Result<Decimal, TagwatchError> {
    let cell = cell.trim().trim_start_matches('$');
    if cell.is_empty() {
        tracing::warn!(%resource_id, line, "blank monthly cost treated as zero");
        return Ok(Decimal::ZERO);
    }
    let cost = Decimal::from_str(cell).map_err(|e| {
        TagwatchError::Schema(format!("line {line}: monthly cost {cell:?} is not a number: {e}"))
    })?;
    check_cost(resource_id.as_str(), cost)
        .map_err(|e| TagwatchError::InvalidInput(format!("line {line}: {e}")))?;
    Ok(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwatch_core::RequiredTags;

    const HEADER: &str = "ResourceID,Service,Region,Department,Environment,MonthlyCostUSD,Owner,Project,Tagged";

    fn options() -> LoadOptions {
        LoadOptions::new(RequiredTags::new(["Owner", "Project"]).unwrap())
    }

    fn csv(rows: &[&str]) -> String {
        let mut s = String::from(HEADER);
        for r in rows {
            s.push('\n');
            s.push_str(r);
        }
        s
    }

    #[test]
    fn loads_rows_in_order() {
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,100.50,alice,atlas,Yes",
            "r2,S3,eu-west-1,,Dev,50,,,No",
        ]);
        let ds = load_str(&text, &options()).unwrap();
        assert_eq!(ds.records.len(), 2);

        let r1 = &ds.records[0];
        assert_eq!(r1.resource_id.as_str(), "r1");
        assert_eq!(r1.service, "EC2");
        assert_eq!(r1.monthly_cost, Decimal::from_str("100.50").unwrap());
        assert_eq!(r1.tag_value("Owner"), Some("alice"));
        assert_eq!(r1.extra.get("Tagged").map(String::as_str), Some("Yes"));

        let r2 = &ds.records[1];
        assert_eq!(r2.department, "Unknown");
        assert!(!r2.has_tag("Owner"));
        assert_eq!(ds.layout.headers.len(), 9);
    }

    #[test]
    fn missing_columns_is_schema_error() {
        let text = "ResourceID,Service,MonthlyCostUSD\nr1,EC2,1\n";
        let err = load_str(text, &options()).unwrap_err();
        match err {
            TagwatchError::Schema(msg) => {
                assert!(msg.contains("Region"));
                assert!(msg.contains("Owner"));
                assert!(msg.contains("Project"));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn bad_cost_is_schema_error_with_line() {
        let text = csv(&["r1,EC2,us-east-1,Finance,Prod,lots,a,b,Yes"]);
        let err = load_str(&text, &options()).unwrap_err();
        assert!(matches!(err, TagwatchError::Schema(ref m) if m.contains("line 2")));
    }

    #[test]
    fn negative_cost_is_invalid_input() {
        let text = csv(&["r1,EC2,us-east-1,Finance,Prod,-3,a,b,Yes"]);
        let err = load_str(&text, &options()).unwrap_err();
        assert!(matches!(err, TagwatchError::InvalidInput(_)));
    }

    #[test]
    fn oversized_cost_is_invalid_input_with_line() {
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,1000000000,a,b,Yes",
            "r2,EC2,us-east-1,Finance,Prod,50000000000000000000000000000,a,b,Yes",
        ]);
        let err = load_str(&text, &options()).unwrap_err();
        match err {
            TagwatchError::InvalidInput(msg) => {
                assert!(msg.contains("line 3"));
                assert!(msg.contains("r2"));
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn blank_cost_is_zero_and_dollar_sign_accepted() {
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,,a,b,Yes",
            "r2,EC2,us-east-1,Finance,Prod,$12.25,a,b,Yes",
        ]);
        let ds = load_str(&text, &options()).unwrap();
        assert_eq!(ds.records[0].monthly_cost, Decimal::ZERO);
        assert_eq!(ds.records[1].monthly_cost, Decimal::from_str("12.25").unwrap());
    }

    #[test]
    fn empty_id_is_schema_error() {
        let text = csv(&[" ,EC2,us-east-1,Finance,Prod,1,a,b,Yes"]);
        assert!(matches!(
            load_str(&text, &options()).unwrap_err(),
            TagwatchError::Schema(_)
        ));
    }

    #[test]
    fn ragged_row_is_schema_error() {
        let text = csv(&["r1,EC2,us-east-1"]);
        assert!(matches!(
            load_str(&text, &options()).unwrap_err(),
            TagwatchError::Schema(_)
        ));
    }

    #[test]
    fn duplicates_keep_first() {
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,10,a,b,Yes",
            "r1,EC2,us-east-1,Sales,Prod,99,a,b,Yes",
            "r2,EC2,us-east-1,Finance,Prod,5,a,b,Yes",
        ]);
        let ds = load_str(&text, &options()).unwrap();
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[0].department, "Finance");
        assert_eq!(ds.summary.original_records, 3);
        assert_eq!(ds.summary.duplicate_records, 1);
        assert_eq!(ds.summary.unique_resources, 2);
        assert!(ds.summary.duplicates_removed);
        assert!((ds.summary.duplication_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn duplicates_reject() {
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,10,a,b,Yes",
            "r1,EC2,us-east-1,Sales,Prod,99,a,b,Yes",
        ]);
        let opts = options().with_duplicates(DuplicatePolicy::Reject);
        let err = load_str(&text, &opts).unwrap_err();
        assert!(matches!(err, TagwatchError::Schema(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn quoted_lines_are_unwrapped() {
        let text = format!(
            "\"{HEADER}\"\n\"r1,EC2,us-east-1,Finance,Prod,10,a,b,Yes\"\n\"r2,S3,us-east-1,Sales,Dev,4,,,No\"\n"
        );
        let ds = load_str(&text, &options()).unwrap();
        assert_eq!(ds.records.len(), 2);
        assert_eq!(ds.records[1].service, "S3");
        assert_eq!(ds.layout.headers[0], "ResourceID");
    }

    #[test]
    fn empty_file_body_loads_no_records() {
        let ds = load_str(HEADER, &options()).unwrap();
        assert!(ds.records.is_empty());
        assert_eq!(ds.summary.duplication_rate(), 0.0);
    }

    #[test]
    fn tag_column_doubling_as_dimension_fills_both() {
        let opts = LoadOptions::new(RequiredTags::new(["Department", "Owner"]).unwrap());
        let text = csv(&[
            "r1,EC2,us-east-1,Finance,Prod,1,a,b,Yes",
            "r2,EC2,us-east-1,,Prod,1,a,b,Yes",
        ]);
        let ds = load_str(&text, &opts).unwrap();
        assert_eq!(ds.records[0].department, "Finance");
        assert_eq!(ds.records[0].tag_value("Department"), Some("Finance"));
        assert_eq!(ds.records[1].department, "Unknown");
        assert!(!ds.records[1].has_tag("Department"));
        // Project is not required here, so it is carried through.
        assert_eq!(ds.records[0].extra.get("Project").map(String::as_str), Some("b"));
    }
}
