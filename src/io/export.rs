//! Record set export back to CSV

use crate::config::ExportConfig;
use crate::error::{AppError, Result};
use crate::models::RecordSet;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// CSV exporter for processed record sets
pub struct CsvExporter;

impl CsvExporter {
    /// File extension of the export
    pub fn extension() -> &'static str {
        "csv"
    }

    /// MIME type of the export
    pub fn mime_type() -> &'static str {
        "text/csv"
    }

    /// Serialize a record set: header row, then every row in order
    pub fn to_bytes(records: &RecordSet) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(records.columns())?;
        for row in records.rows() {
            writer.write_record(row)?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::Serialization(format!("CSV flush failed: {}", e)))
    }

    /// Write the export into the configured directory, creating it on demand
    pub async fn export(records: &RecordSet, config: &ExportConfig) -> Result<PathBuf> {
        let bytes = Self::to_bytes(records)?;

        fs::create_dir_all(&config.directory).await.map_err(|e| {
            AppError::Processing(format!(
                "Failed to create export directory {}: {}",
                config.directory.display(),
                e
            ))
        })?;

        let output_path = config.output_path();
        fs::write(&output_path, &bytes).await.map_err(|e| {
            AppError::Processing(format!(
                "Failed to write {}: {}",
                output_path.display(),
                e
            ))
        })?;

        info!(
            path = %output_path.display(),
            rows = records.len(),
            bytes = bytes.len(),
            "Exported processed issues"
        );

        Ok(output_path)
    }
}
