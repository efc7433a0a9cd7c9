//! Output formatting and persistence for query results.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist. The record
/// must be flat: nested structs cannot be written as CSV.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Appends every record to `path`, writing headers only for a new file.
pub fn append_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    for record in records {
        append_record(path, record)?;
    }
    info!(path = %path.display(), rows = records.len(), "CSV report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Tier;
    use crate::analytics::types::SummaryRow;
    use std::fs;

    fn row(id: &str) -> SummaryRow {
        SummaryRow {
            student_id: id.to_string(),
            average: 72.5,
            status: Tier::Gold,
            predicted_assessment_id: Some(1758),
            predicted_score: None,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&row("1"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&row("1")).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        append_record(&path, &row("11391")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "student_id,average,status,predicted_assessment_id,predicted_score\n\
             11391,72.5,gold,1758,\n"
        );
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        append_records(&path, &[row("1"), row("2")]).unwrap();
        append_record(&path, &row("3")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("student_id")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 4);
    }
}
