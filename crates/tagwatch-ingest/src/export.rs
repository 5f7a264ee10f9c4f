//! # CSV Export
//!
//! Writes a record collection back out with the header order of the file it
//! was loaded from. Tag columns take the record's current tag values, so an
//! exported remediation reflects every applied edit. A legacy
//! [`LEGACY_TAGGED_COLUMN`] is rewritten as `Yes`/`No` from the record's
//! required tags rather than copied from the source row.

use std::io::Write;
use std::path::Path;

use tagwatch_core::{RequiredTags, ResourceRecord, TagwatchError};

use crate::columns::ColumnMapping;

/// Yes/No column some inventory exports carry for "fully tagged".
pub const LEGACY_TAGGED_COLUMN: &str = "Tagged";

/// Header order and column mapping of a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvLayout {
    pub headers: Vec<String>,
    pub columns: ColumnMapping,
    /// Policy the file was loaded under; drives [`LEGACY_TAGGED_COLUMN`].
    pub required_tags: RequiredTags,
}

impl CsvLayout {
    fn cell<'r>(&self, header: &str, record: &'r ResourceRecord, cost: &'r str) -> &'r str {
        if let Some(value) = record.tags.get(header) {
            return value;
        }
        if header == self.columns.resource_id {
            return record.resource_id.as_str();
        }
        if header == self.columns.monthly_cost {
            return cost;
        }
        if let Some(dimension) = self.columns.dimension_of(header) {
            return record.dimension(dimension);
        }
        if header == LEGACY_TAGGED_COLUMN {
            let fully = self.required_tags.iter().all(|key| record.has_tag(key));
            return if fully { "Yes" } else { "No" };
        }
        record.extra.get(header).map(String::as_str).unwrap_or("")
    }
}

/// Write `records` as CSV using `layout`'s header order.
pub fn write_records<W: Write>(
    writer: W,
    layout: &CsvLayout,
    records: &[ResourceRecord],
) -> Result<(), TagwatchError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&layout.headers).map_err(csv_error)?;
    for record in records {
        let cost = record.monthly_cost.to_string();
        let row: Vec<&str> = layout
            .headers
            .iter()
            .map(|h| layout.cell(h, record, &cost))
            .collect();
        wtr.write_record(&row).map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to a file at `path`, replacing any existing file.
pub fn export_path(
    path: &Path,
    layout: &CsvLayout,
    records: &[ResourceRecord],
) -> Result<(), TagwatchError> {
    let file = std::fs::File::create(path)?;
    write_records(std::io::BufWriter::new(file), layout, records)?;
    tracing::info!(path = %path.display(), records = records.len(), "exported records");
    Ok(())
}

fn csv_error(err: csv::Error) -> TagwatchError {
    if err.is_io_error() {
        match err.into_kind() {
            csv::ErrorKind::Io(io) => TagwatchError::Io(io),
            other => TagwatchError::Schema(format!("csv write failed: {other:?}")),
        }
    } else {
        TagwatchError::Schema(format!("csv write failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::LoadOptions;
    use crate::loader::load_str;
    use tagwatch_core::RequiredTags;

    const INPUT: &str = "\
ResourceID,Service,Region,Department,Environment,MonthlyCostUSD,Owner,Project,Tagged
r1,EC2,us-east-1,Finance,Prod,100.50,alice,atlas,Yes
r2,S3,eu-west-1,,Dev,50,,,No
";

    fn to_string(layout: &CsvLayout, records: &[ResourceRecord]) -> String {
        let mut buf = Vec::new();
        write_records(&mut buf, layout, records).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn export_preserves_header_order_and_values() {
        let opts = LoadOptions::new(RequiredTags::new(["Owner", "Project"]).unwrap());
        let ds = load_str(INPUT, &opts).unwrap();
        let out = to_string(&ds.layout, &ds.records);
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("ResourceID,Service,Region,Department,Environment,MonthlyCostUSD,Owner,Project,Tagged")
        );
        assert_eq!(lines.next(), Some("r1,EC2,us-east-1,Finance,Prod,100.50,alice,atlas,Yes"));
        // Blank department is normalised on load.
        assert_eq!(lines.next(), Some("r2,S3,eu-west-1,Unknown,Dev,50,,,No"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn export_reflects_tag_edits() {
        let opts = LoadOptions::new(RequiredTags::new(["Owner", "Project"]).unwrap());
        let ds = load_str(INPUT, &opts).unwrap();
        let mut records = ds.records.clone();
        records[1].set_tag("Owner", "bob");
        let out = to_string(&ds.layout, &records);
        assert!(out.contains("r2,S3,eu-west-1,Unknown,Dev,50,bob,,No"));
    }

    #[test]
    fn tagged_column_follows_remediation() {
        let opts = LoadOptions::new(RequiredTags::new(["Owner", "Project"]).unwrap());
        let ds = load_str(INPUT, &opts).unwrap();
        let mut records = ds.records.clone();
        records[1].set_tag("Owner", "bob");
        records[1].set_tag("Project", "atlas");
        records[0].set_tag("Project", "");
        let out = to_string(&ds.layout, &records);
        assert!(out.contains("r1,EC2,us-east-1,Finance,Prod,100.50,alice,,No"));
        assert!(out.contains("r2,S3,eu-west-1,Unknown,Dev,50,bob,atlas,Yes"));
    }

    #[test]
    fn required_dimension_tag_exports_raw_tag_value() {
        let opts = LoadOptions::new(RequiredTags::new(["Department", "Owner"]).unwrap());
        let ds = load_str(INPUT, &opts).unwrap();
        let out = to_string(&ds.layout, &ds.records);
        // The tag value (blank) wins over the normalised attribute.
        assert!(out.contains("r2,S3,eu-west-1,,Dev,50,,,No"));
    }

    #[test]
    fn export_empty_collection_writes_header_only() {
        let opts = LoadOptions::new(RequiredTags::new(["Owner"]).unwrap());
        let ds = load_str(INPUT, &opts).unwrap();
        let out = to_string(&ds.layout, &[]);
        assert_eq!(out.lines().count(), 1);
    }
}
