//! Backlog Insights
//!
//! Groups issues from a JIRA/Linear CSV export into themes with TF-IDF features and mini-batch
//! k-means, ranks them by RICE score, and reports descriptive statistics about the backlog.
//!
//! ```no_run
//! use backlog_insights::{CsvReader, Pipeline, PipelineConfig};
//!
//! fn main() -> backlog_insights::Result<()> {
//!     let records = CsvReader::from_path("issues.csv")?;
//!     let output = Pipeline::new(PipelineConfig::default())?.run(records)?;
//!
//!     for warning in output.warning_messages() {
//!         eprintln!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod io;
pub mod ml;
pub mod models;
pub mod pipeline;
pub mod scoring;

pub use analytics::{AnalysisReport, BacklogStatistics};
pub use config::Config;
pub use error::{AppError, Result};
pub use io::{CsvExporter, CsvReader};
pub use models::{IssueField, RecordSet};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput, PipelineWarning};
