//! CSV ingestion for the assessment, registration and student tables.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::config::DataPaths;
use crate::dataset::Dataset;

pub const ASSESSMENTS_FILE: &str = "studentAssessment.csv";
pub const REGISTRATIONS_FILE: &str = "studentRegistration.csv";
pub const STUDENTS_FILE: &str = "studentInfo.csv";

/// Deserializes every row of a headed CSV stream.
///
/// Headers and fields are trimmed; columns not named by `T` are ignored.
pub fn read_records<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line, result) in rdr.deserialize().enumerate() {
        let record: T = result.with_context(|| format!("Malformed CSV row {}", line + 1))?;
        rows.push(record);
    }

    Ok(rows)
}

/// Reads a single CSV table from disk.
pub fn load_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    read_records(file).with_context(|| format!("Failed to read {}", path.display()))
}

/// Loads all three tables and builds the [`Dataset`].
#[tracing::instrument(skip_all, fields(data_dir = %paths.data_dir.display()))]
pub fn load_dataset(paths: &DataPaths) -> Result<Dataset> {
    let assessments = load_table(&paths.resolve(ASSESSMENTS_FILE)?)?;
    let registrations = load_table(&paths.resolve(REGISTRATIONS_FILE)?)?;
    let students = load_table(&paths.resolve(STUDENTS_FILE)?)?;

    let dataset = Dataset::new(assessments, registrations, students);
    info!(
        assessments = dataset.assessments().len(),
        registrations = dataset.registrations().len(),
        students = dataset.students().len(),
        "Dataset loaded"
    );

    Ok(dataset)
}
