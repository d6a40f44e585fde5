use crate::ml::{ClusteringConfig, ClusteringOutcome, VectorizerConfig};
use crate::models::RecordSet;
use crate::scoring::RiceParams;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PipelineConfig {
    /// Run the clustering stage
    pub run_clustering: bool,

    /// Run the scoring stage
    pub run_scoring: bool,

    /// Vectorizer settings
    #[validate(nested)]
    pub vectorizer: VectorizerConfig,

    /// Clustering settings, including the seed
    #[validate(nested)]
    pub clustering: ClusteringConfig,

    /// RICE inputs
    #[validate(nested)]
    pub rice: RiceParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            run_clustering: true,
            run_scoring: true,
            vectorizer: VectorizerConfig::default(),
            clustering: ClusteringConfig::default(),
            rice: RiceParams::default(),
        }
    }
}

/// Non-fatal conditions reported alongside results
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PipelineWarning {
    #[error("clustering skipped: missing text fields")]
    ClusteringMissingText,

    #[error("clustering skipped: no issues")]
    ClusteringNoIssues,

    #[error("k reduced from {requested} to {actual}")]
    ClusterCountReduced { requested: usize, actual: usize },

    #[error("clustering degenerate: no terms left after stop-word removal")]
    EmptyVocabulary,

    #[error("scoring skipped: missing story_points field")]
    ScoringMissingStoryPoints,

    #[error("story_points missing or invalid in {rows} rows, defaulted to 1")]
    StoryPointsDefaulted { rows: usize },
}

/// Result of a pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Input records plus `cluster` / `RICE` columns for the stages that ran
    pub records: RecordSet,

    /// Clustering details, when the stage ran
    pub clustering: Option<ClusteringOutcome>,

    /// Vocabulary behind the clustering features, in column order
    pub vocabulary: Vec<String>,

    /// RICE score per row, when the stage ran
    pub scores: Option<Vec<f64>>,

    /// Every skip or adjustment made
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineOutput {
    /// Warning messages as displayed to users
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_messages() {
        assert_eq!(
            PipelineWarning::ClusterCountReduced {
                requested: 10,
                actual: 3
            }
            .to_string(),
            "k reduced from 10 to 3"
        );
        assert_eq!(
            PipelineWarning::ClusteringMissingText.to_string(),
            "clustering skipped: missing text fields"
        );
        assert_eq!(
            PipelineWarning::StoryPointsDefaulted { rows: 2 }.to_string(),
            "story_points missing or invalid in 2 rows, defaulted to 1"
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_nested_validation() {
        let mut config = PipelineConfig::default();
        config.clustering.n_clusters = 11;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.rice.confidence = 0;
        assert!(config.validate().is_err());
    }
}
