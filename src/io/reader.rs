use crate::error::{AppError, Result};
use crate::models::{Record, RecordSet};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads CSV exports into record sets
pub struct CsvReader;

impl CsvReader {
    /// Parse CSV bytes. The first row is the header.
    pub fn from_bytes(bytes: &[u8]) -> Result<RecordSet> {
        Self::from_reader(bytes)
    }

    /// Parse CSV from any reader.
    ///
    /// Rows shorter than the header are padded with empty (null) cells; longer rows are fatal.
    pub fn from_reader<R: Read>(reader: R) -> Result<RecordSet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let width = columns.len();
        let mut records = RecordSet::new(columns)?;
        let mut padded = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            let mut row: Record = record.iter().map(|v| v.to_string()).collect();
            if row.len() < width {
                row.resize(width, String::new());
                padded += 1;
            }
            records.push_row(row)?;
        }

        debug!(
            rows = records.len(),
            columns = records.columns().len(),
            padded,
            "Parsed CSV input"
        );

        Ok(records)
    }

    /// Read and parse a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<RecordSet> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::InvalidInput(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_bytes(&bytes)
    }
}
