//! Backlog analytics
//!
//! Descriptive statistics over an issue export plus reporting on pipeline results:
//!
//! - **Statistics**: status/priority breakdowns, story-point distribution, percentiles and
//!   outliers, `created_at` range
//! - **Cluster summaries**: size, heaviest centroid terms and sample issues per cluster
//! - **Top issues**: the highest RICE scores
//! - **Reports**: a serialisable bundle of all of the above plus pipeline warnings

mod error;
mod report;
mod statistics;
mod summary;

pub use error::{AnalyticsError, AnalyticsResult};
pub use report::AnalysisReport;
pub use statistics::{
    detect_outliers, parse_timestamp, BacklogStatistics, DateRange, Distribution, Percentiles,
    StoryPointStatistics,
};
pub use summary::{
    top_by_score, ClusterSummary, IssueSample, RankedIssue, DEFAULT_TOP_ISSUES,
    MAX_CLUSTER_SAMPLES, TOP_TERMS,
};
