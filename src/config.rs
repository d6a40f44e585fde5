use crate::ml::{ClusteringConfig, VectorizerConfig};
use crate::pipeline::PipelineConfig;
use crate::scoring::RiceParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Engine (pipeline) configuration
    pub engine: EngineConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path = std::env::var("BACKLOG_CONFIG_PATH")
            .unwrap_or_else(|_| "config/backlog.toml".to_string());

        Self::load_from(Path::new(&config_path))
    }

    /// Load configuration using an explicit override file
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix: BACKLOG__)
            .add_source(
                config::Environment::with_prefix("BACKLOG")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Configuration built only from the embedded defaults
    pub fn defaults() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()?
            .try_deserialize()
    }
}

/// Engine options, flat so they map one-to-one onto TOML keys and env vars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Run the text clustering stage
    #[serde(default = "default_true")]
    pub run_clustering: bool,

    /// Run the RICE scoring stage
    #[serde(default = "default_true")]
    pub run_scoring: bool,

    /// Requested number of clusters (2-10)
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,

    /// Maximum TF-IDF vocabulary size
    #[serde(default = "default_max_vocabulary")]
    pub max_vocabulary: usize,

    /// Seed for centroid initialisation and batch sampling
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Iteration cap for k-means
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,

    /// Mini-batch size for k-means
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// k-means initialisations; the lowest-inertia run is kept
    #[serde(default = "default_n_init")]
    pub n_init: usize,

    /// Default reach (1-100)
    #[serde(default = "default_reach")]
    pub reach: u32,

    /// Default impact (1-10)
    #[serde(default = "default_impact")]
    pub impact: u32,

    /// Default confidence percentage (1-100)
    #[serde(default = "default_confidence")]
    pub confidence: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            run_clustering: true,
            run_scoring: true,
            n_clusters: default_n_clusters(),
            max_vocabulary: default_max_vocabulary(),
            random_seed: default_random_seed(),
            max_iter: default_max_iter(),
            batch_size: default_batch_size(),
            n_init: default_n_init(),
            reach: default_reach(),
            impact: default_impact(),
            confidence: default_confidence(),
        }
    }
}

impl EngineConfig {
    /// Build the pipeline configuration. Ranges are checked by the pipeline.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        let mut clustering = ClusteringConfig::new(self.n_clusters, self.random_seed);
        clustering.max_iter = self.max_iter;
        clustering.batch_size = self.batch_size;
        clustering.n_init = self.n_init;

        PipelineConfig {
            run_clustering: self.run_clustering,
            run_scoring: self.run_scoring,
            vectorizer: VectorizerConfig {
                max_features: self.max_vocabulary,
            },
            clustering,
            rice: RiceParams {
                reach: self.reach,
                impact: self.impact,
                confidence: self.confidence,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Relative directory the export is written into (created on demand)
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,

    /// Export file name
    #[serde(default = "default_export_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            file_name: default_export_file_name(),
        }
    }
}

impl ExportConfig {
    /// Full path of the export file
    pub fn output_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_n_clusters() -> usize {
    5
}

fn default_max_vocabulary() -> usize {
    100
}

fn default_random_seed() -> u64 {
    42
}

fn default_max_iter() -> usize {
    100
}

fn default_batch_size() -> usize {
    1024
}

fn default_n_init() -> usize {
    3
}

fn default_reach() -> u32 {
    50
}

fn default_impact() -> u32 {
    5
}

fn default_confidence() -> u32 {
    80
}

fn default_export_directory() -> PathBuf {
    PathBuf::from("exports")
}

fn default_export_file_name() -> String {
    "processed_issues.csv".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_n_clusters(), 5);
        assert_eq!(default_reach(), 50);
        assert_eq!(default_impact(), 5);
        assert_eq!(default_confidence(), 80);
        assert_eq!(default_max_vocabulary(), 100);
        assert_eq!(default_random_seed(), 42);
        assert_eq!(default_n_init(), 3);
        assert!(default_true());
    }

    #[test]
    fn test_embedded_defaults_match_engine_default() {
        let config = Config::defaults().unwrap();
        let engine = EngineConfig::default();

        assert_eq!(config.engine.n_clusters, engine.n_clusters);
        assert_eq!(config.engine.max_vocabulary, engine.max_vocabulary);
        assert_eq!(config.engine.random_seed, engine.random_seed);
        assert_eq!(config.engine.n_init, engine.n_init);
        assert_eq!(config.engine.reach, engine.reach);
        assert_eq!(config.export.output_path(), PathBuf::from("exports/processed_issues.csv"));
        assert!(!config.observability.json_logs);
    }

    #[test]
    fn test_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backlog.toml");
        std::fs::write(&path, "[engine]\nn_clusters = 3\nrun_scoring = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.engine.n_clusters, 3);
        assert!(!config.engine.run_scoring);
        assert_eq!(config.engine.reach, 50);
    }

    #[test]
    fn test_to_pipeline_config() {
        let engine = EngineConfig {
            n_clusters: 7,
            random_seed: 7,
            max_vocabulary: 20,
            n_init: 5,
            ..Default::default()
        };
        let pipeline = engine.to_pipeline_config();

        assert_eq!(pipeline.clustering.n_init, 5);
        assert_eq!(pipeline.clustering.n_clusters, 7);
        assert_eq!(pipeline.clustering.random_seed, 7);
        assert_eq!(pipeline.vectorizer.max_features, 20);
        assert_eq!(pipeline.rice.confidence, 80);
    }
}
