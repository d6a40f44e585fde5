use ndarray::Array2;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// TF-IDF vectorizer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VectorizerConfig {
    /// Maximum vocabulary size (columns of the feature matrix)
    #[validate(range(min = 1))]
    pub max_features: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self { max_features: 100 }
    }
}

/// Mini-batch k-means configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClusteringConfig {
    /// Requested number of clusters
    #[validate(range(min = 2, max = 10))]
    pub n_clusters: usize,

    /// Seed for k-means++ initialisation and batch sampling
    pub random_seed: u64,

    /// Iteration cap
    #[validate(range(min = 1))]
    pub max_iter: usize,

    /// Rows sampled per iteration
    #[validate(range(min = 1))]
    pub batch_size: usize,

    /// Early-stop threshold on the summed squared centre shift
    #[validate(range(min = 0.0))]
    pub tol: f64,

    /// Independent initialisations; the lowest-inertia run is kept
    #[validate(range(min = 1))]
    pub n_init: usize,
}

impl ClusteringConfig {
    /// Create a configuration with an explicit seed
    pub fn new(n_clusters: usize, random_seed: u64) -> Self {
        Self {
            n_clusters,
            random_seed,
            max_iter: 100,
            batch_size: 1024,
            tol: 1e-6,
            n_init: 3,
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self::new(5, 42)
    }
}

/// Result of a clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringOutcome {
    /// Label per input row, in [0, n_clusters)
    pub labels: Vec<usize>,

    /// Cluster count actually used
    pub n_clusters: usize,

    /// Cluster count that was asked for
    pub requested_clusters: usize,

    /// Final centres (n_clusters × n_features)
    pub centroids: Array2<f64>,

    /// Sum of squared distances of rows to their centre
    pub inertia: f64,

    /// Mini-batch iterations of the kept run
    pub iterations: usize,

    /// All-zero input: labels are row index modulo k
    pub degenerate: bool,
}

impl ClusteringOutcome {
    /// Whether k was clamped to the number of rows
    pub fn was_reduced(&self) -> bool {
        self.n_clusters < self.requested_clusters
    }

    /// Number of rows per cluster label
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &label in &self.labels {
            sizes[label] += 1;
        }
        sizes
    }
}
