use crate::error::Result;
use crate::io::CsvReader;
use crate::ml::{ClusteringOutcome, MiniBatchKMeans, TextCombiner, TfidfVectorizer};
use crate::models::{parse_story_points, IssueField, RecordSet, CLUSTER_COLUMN, RICE_COLUMN};
use crate::pipeline::models::{PipelineConfig, PipelineOutput, PipelineWarning};
use crate::scoring::{format_score, PriorityScorer};
use std::time::Instant;
use tracing::{debug, info, warn};
use validator::Validate;

/// Orchestrates the clustering and scoring stages over one record set.
///
/// A pipeline holds only its configuration; every run works on the record set it is given.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline, rejecting out-of-range configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse CSV bytes and run the pipeline over them
    pub fn run_csv(&self, bytes: &[u8]) -> Result<PipelineOutput> {
        let records = CsvReader::from_bytes(bytes)?;
        self.run(records)
    }

    /// Run the enabled stages and attach their result columns
    pub fn run(&self, mut records: RecordSet) -> Result<PipelineOutput> {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!(
            issues = records.len(),
            run_clustering = self.config.run_clustering,
            run_scoring = self.config.run_scoring,
            "Running backlog pipeline"
        );

        let mut clustering = None;
        let mut vocabulary = Vec::new();
        if self.config.run_clustering {
            if let Some((outcome, terms)) = self.cluster(&records, &mut warnings)? {
                let labels = outcome.labels.iter().map(|l| l.to_string()).collect();
                records.set_column(CLUSTER_COLUMN, labels)?;
                clustering = Some(outcome);
                vocabulary = terms;
            }
        }

        let mut scores = None;
        if self.config.run_scoring {
            if let Some(values) = self.score(&records, &mut warnings) {
                let rendered = values.iter().map(|s| format_score(*s)).collect();
                records.set_column(RICE_COLUMN, rendered)?;
                scores = Some(values);
            }
        }

        for warning in &warnings {
            warn!("{}", warning);
        }

        info!(
            issues = records.len(),
            warnings = warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Backlog pipeline completed"
        );

        Ok(PipelineOutput {
            records,
            clustering,
            vocabulary,
            scores,
            warnings,
        })
    }

    /// TextCombiner -> TfidfVectorizer -> MiniBatchKMeans
    fn cluster(
        &self,
        records: &RecordSet,
        warnings: &mut Vec<PipelineWarning>,
    ) -> Result<Option<(ClusteringOutcome, Vec<String>)>> {
        if !records.has_field(IssueField::Title) || !records.has_field(IssueField::Description) {
            warnings.push(PipelineWarning::ClusteringMissingText);
            return Ok(None);
        }

        if records.is_empty() {
            warnings.push(PipelineWarning::ClusteringNoIssues);
            return Ok(None);
        }

        let documents = TextCombiner::combine(
            records,
            IssueField::Title.column_name(),
            IssueField::Description.column_name(),
        );

        let mut vectorizer = TfidfVectorizer::new(self.config.vectorizer.clone());
        let features = vectorizer.fit_transform(&documents)?;
        debug!(
            documents = documents.len(),
            vocab_size = vectorizer.vocab_size(),
            "Built TF-IDF features"
        );

        if vectorizer.vocab_size() == 0 {
            warnings.push(PipelineWarning::EmptyVocabulary);
        }

        let outcome = MiniBatchKMeans::new(self.config.clustering.clone()).fit_predict(&features)?;
        if outcome.was_reduced() {
            warnings.push(PipelineWarning::ClusterCountReduced {
                requested: outcome.requested_clusters,
                actual: outcome.n_clusters,
            });
        }

        info!(
            k = outcome.n_clusters,
            iterations = outcome.iterations,
            inertia = outcome.inertia,
            "Clustering stage finished"
        );

        Ok(Some((outcome, vectorizer.vocabulary().to_vec())))
    }

    /// RICE score per row
    fn score(&self, records: &RecordSet, warnings: &mut Vec<PipelineWarning>) -> Option<Vec<f64>> {
        if !records.has_field(IssueField::StoryPoints) {
            warnings.push(PipelineWarning::ScoringMissingStoryPoints);
            return None;
        }

        let scorer = PriorityScorer::new(self.config.rice);
        let story_points: Vec<Option<f64>> = records
            .column_values(IssueField::StoryPoints.column_name())
            .into_iter()
            .map(|v| v.and_then(parse_story_points))
            .collect();

        let defaulted = story_points.iter().filter(|p| p.is_none()).count();
        if defaulted > 0 {
            warnings.push(PipelineWarning::StoryPointsDefaulted { rows: defaulted });
        }

        Some(story_points.into_iter().map(|p| scorer.score(p)).collect())
    }
}
