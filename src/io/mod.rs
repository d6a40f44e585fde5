//! CSV ingestion and export of issue record sets

mod export;
mod reader;

pub use export::CsvExporter;
pub use reader::CsvReader;
