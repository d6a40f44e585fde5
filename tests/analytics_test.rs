/// Integration tests for backlog statistics and analysis reports
mod common;

use backlog_insights::{
    analytics::{AnalysisReport, BacklogStatistics, DEFAULT_TOP_ISSUES},
    ml::ClusteringConfig,
    Pipeline, PipelineConfig,
};
use common::{backlog, parse};

#[test]
fn test_backlog_statistics() {
    let stats = BacklogStatistics::from_records(&backlog());

    assert_eq!(stats.total_issues, 8);
    assert_eq!(stats.unique_statuses, Some(3));
    assert_eq!(stats.unique_priorities, Some(3));
    assert_eq!(stats.status_breakdown.get("Open"), Some(&5));
    assert_eq!(stats.priority_breakdown.get("High"), Some(&3));

    let points = stats.story_points.as_ref().unwrap();
    assert_eq!(points.missing, 1);
    assert_eq!(points.total, 24.0);
    assert_eq!(points.distribution.count, 7);
    assert_eq!(points.distribution.median, 3.0);
    assert_eq!(points.distribution.mode, Some(2.0));

    let range = stats.created_range.as_ref().unwrap();
    assert_eq!(range.earliest.date_naive().to_string(), "2024-01-05");
    assert_eq!(range.latest.date_naive().to_string(), "2024-03-04");
}

#[test]
fn test_statistics_without_optional_columns() {
    let stats = BacklogStatistics::from_records(&parse("title\nLogin\nInvoice\n"));

    assert_eq!(stats.total_issues, 2);
    assert!(stats.unique_statuses.is_none());
    assert!(stats.status_breakdown.is_empty());
    assert!(stats.story_points.is_none());
}

#[test]
fn test_analysis_report() {
    let mut config = PipelineConfig::default();
    config.clustering = ClusteringConfig::new(3, 42);
    let output = Pipeline::new(config).unwrap().run(backlog()).unwrap();

    let report = AnalysisReport::from_output(&output, DEFAULT_TOP_ISSUES).unwrap();

    assert_eq!(report.clusters.len(), 3);
    assert_eq!(report.clusters.iter().map(|c| c.size).sum::<usize>(), 8);
    assert!(report.clusters.iter().all(|c| c.samples.len() == c.size));
    assert!(report
        .clusters
        .iter()
        .filter(|c| c.size > 0)
        .all(|c| !c.top_terms.is_empty()));

    // Story points 1 and missing both score 200; input order breaks the tie
    assert_eq!(report.top_issues.len(), 8);
    assert_eq!(report.top_issues[0].title.as_deref(), Some("Invoice currency"));
    assert_eq!(report.top_issues[1].title.as_deref(), Some("Duplicate invoice emails"));
    assert_eq!(report.top_issues[0].rice, 200.0);

    assert_eq!(
        report.warnings,
        vec!["story_points missing or invalid in 1 rows, defaulted to 1".to_string()]
    );
}

#[test]
fn test_report_serializes() {
    let config = PipelineConfig {
        run_clustering: false,
        ..Default::default()
    };
    let output = Pipeline::new(config).unwrap().run(backlog()).unwrap();
    let report = AnalysisReport::from_output(&output, 3).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["clusters"].as_array().unwrap().len(), 0);
    assert_eq!(json["top_issues"].as_array().unwrap().len(), 3);
    assert_eq!(json["top_issues"][0]["RICE"], 200.0);
    assert_eq!(json["statistics"]["total_issues"], 8);
}
