//! CSV loading for the raw delivery dataset.

use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::cleaner::{clean, CleanReport, DeliveryTable};
use crate::error::{DashboardError, Result};
use crate::models::{RawRecord, REQUIRED_COLUMNS};

/// Reads every row of the delivery CSV at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened, a required header is missing, or a
/// row does not deserialize.
pub fn read_raw(path: &Path) -> Result<Vec<RawRecord>> {
    info!("Reading CSV from {:?}", path);
    let file = std::fs::File::open(path)?;
    read_raw_from(file)
}

/// Same as [`read_raw`], for any reader (used by tests and in-memory input).
pub fn read_raw_from<R: Read>(input: R) -> Result<Vec<RawRecord>> {
    // Only headers are trimmed; field padding is the cleaner's job
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DashboardError::MissingColumn(column.to_string()));
        }
    }

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<RawRecord>, csv::Error>>()?;

    debug!(rows = records.len(), "Parsed raw records");
    Ok(records)
}

/// Reads and cleans the dataset in one step.
pub fn load_table(path: &Path) -> Result<(DeliveryTable, CleanReport)> {
    let raw = read_raw(path)?;
    let (table, report) = clean(raw)?;
    info!(
        rows_read = report.rows_read,
        rows_kept = report.rows_kept,
        missing_durations = report.missing_durations,
        "Cleaned delivery table"
    );
    Ok((table, report))
}
