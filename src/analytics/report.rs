use crate::analytics::error::AnalyticsResult;
use crate::analytics::statistics::BacklogStatistics;
use crate::analytics::summary::{top_by_score, ClusterSummary, RankedIssue};
use crate::pipeline::PipelineOutput;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the CLI reports about one analysed backlog
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub statistics: BacklogStatistics,

    /// Empty when clustering did not run
    pub clusters: Vec<ClusterSummary>,

    /// Empty when scoring did not run
    pub top_issues: Vec<RankedIssue>,

    pub warnings: Vec<String>,
}

impl AnalysisReport {
    /// Build a report from a pipeline run, listing the `top_n` highest-RICE issues
    pub fn from_output(output: &PipelineOutput, top_n: usize) -> AnalyticsResult<Self> {
        let clusters = match &output.clustering {
            Some(outcome) => {
                ClusterSummary::from_outcome(outcome, &output.vocabulary, &output.records)?
            }
            None => Vec::new(),
        };

        let top_issues = match &output.scores {
            Some(scores) => top_by_score(&output.records, scores, top_n)?,
            None => Vec::new(),
        };

        Ok(Self {
            generated_at: Utc::now(),
            statistics: BacklogStatistics::from_records(&output.records),
            clusters,
            top_issues,
            warnings: output.warning_messages(),
        })
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::CsvReader;
    use crate::pipeline::{Pipeline, PipelineConfig};

    #[test]
    fn test_report_from_output() {
        let records = CsvReader::from_bytes(
            b"title,description,story_points\nLogin timeout,Token expired,2\nInvoice export,Totals wrong,\n",
        )
        .unwrap();
        let output = Pipeline::new(PipelineConfig::default())
            .unwrap()
            .run(records)
            .unwrap();

        let report = AnalysisReport::from_output(&output, 1).unwrap();
        assert_eq!(report.clusters.len(), 2);
        assert_eq!(report.top_issues.len(), 1);
        assert_eq!(report.top_issues[0].row, 1);
        assert_eq!(report.statistics.total_issues, 2);
        assert!(report
            .warnings
            .contains(&"k reduced from 5 to 2".to_string()));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"RICE\": 200.0"));
    }
}
