//! Per-cluster summaries and the highest-priority issues

use crate::analytics::error::{AnalyticsError, AnalyticsResult};
use crate::ml::ClusteringOutcome;
use crate::models::{IssueField, RecordSet};
use crate::scoring::rank_by_score;
use serde::Serialize;

/// Sample issues listed per cluster
pub const MAX_CLUSTER_SAMPLES: usize = 10;

/// Centroid terms listed per cluster
pub const TOP_TERMS: usize = 5;

/// Issues listed by `top_by_score` when no count is given
pub const DEFAULT_TOP_ISSUES: usize = 10;

/// Short view of one issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSample {
    pub row: usize,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

/// One cluster's size, characteristic terms and example issues
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSummary {
    pub label: usize,
    pub size: usize,

    /// Heaviest centroid terms, strongest first
    pub top_terms: Vec<String>,

    pub samples: Vec<IssueSample>,
}

impl ClusterSummary {
    /// Summaries for every cluster label, in label order
    pub fn from_outcome(
        outcome: &ClusteringOutcome,
        vocabulary: &[String],
        records: &RecordSet,
    ) -> AnalyticsResult<Vec<Self>> {
        if outcome.labels.len() != records.len() {
            return Err(AnalyticsError::LengthMismatch {
                expected: records.len(),
                actual: outcome.labels.len(),
            });
        }

        let sizes = outcome.cluster_sizes();
        let summaries = (0..outcome.n_clusters)
            .map(|label| {
                let samples = outcome
                    .labels
                    .iter()
                    .enumerate()
                    .filter(|(_, &l)| l == label)
                    .take(MAX_CLUSTER_SAMPLES)
                    .map(|(row, _)| IssueSample {
                        row,
                        title: owned(records.field(row, IssueField::Title)),
                        priority: owned(records.field(row, IssueField::Priority)),
                        status: owned(records.field(row, IssueField::Status)),
                    })
                    .collect();

                Self {
                    label,
                    size: sizes[label],
                    top_terms: top_terms(outcome, vocabulary, label),
                    samples,
                }
            })
            .collect();

        Ok(summaries)
    }
}

fn top_terms(outcome: &ClusteringOutcome, vocabulary: &[String], label: usize) -> Vec<String> {
    if outcome.centroids.ncols() != vocabulary.len() {
        return Vec::new();
    }

    let centroid = outcome.centroids.row(label);
    let mut weighted: Vec<(usize, f64)> = centroid
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, w)| *w > 0.0)
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1));

    weighted
        .into_iter()
        .take(TOP_TERMS)
        .map(|(idx, _)| vocabulary[idx].clone())
        .collect()
}

/// A highly ranked issue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedIssue {
    pub row: usize,
    pub title: Option<String>,
    pub story_points: Option<String>,

    #[serde(rename = "RICE")]
    pub rice: f64,
}

/// The `n` highest-scoring issues; equal scores keep input order
pub fn top_by_score(
    records: &RecordSet,
    scores: &[f64],
    n: usize,
) -> AnalyticsResult<Vec<RankedIssue>> {
    if scores.len() != records.len() {
        return Err(AnalyticsError::LengthMismatch {
            expected: records.len(),
            actual: scores.len(),
        });
    }

    Ok(rank_by_score(scores)
        .into_iter()
        .take(n)
        .map(|row| RankedIssue {
            row,
            title: owned(records.field(row, IssueField::Title)),
            story_points: owned(records.field(row, IssueField::StoryPoints)),
            rice: scores[row],
        })
        .collect())
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}
