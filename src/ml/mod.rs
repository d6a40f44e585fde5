/// Text feature extraction and clustering for backlog issues
///
/// This module provides:
/// - Document building from issue title and description
/// - TF-IDF vectorization with English stop-word removal
/// - Seeded mini-batch k-means clustering

pub mod clustering;
pub mod features;
pub mod models;
pub mod stopwords;

pub use clustering::MiniBatchKMeans;
pub use features::{TextCombiner, TextPreprocessor, TfidfVectorizer};
pub use models::{ClusteringConfig, ClusteringOutcome, VectorizerConfig};
pub use stopwords::is_stop_word;
