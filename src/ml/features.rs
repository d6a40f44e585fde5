use crate::error::{AppError, Result};
use crate::ml::models::VectorizerConfig;
use crate::ml::stopwords::is_stop_word;
use crate::models::RecordSet;
use ndarray::{Array1, Array2};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w\w+\b").expect("token pattern is a valid regex")
});

/// Builds one document per issue from two free-text columns
pub struct TextCombiner;

impl TextCombiner {
    /// `trim(field_a) + " " + trim(field_b)` per record; absent or null cells count as empty
    pub fn combine(records: &RecordSet, field_a: &str, field_b: &str) -> Vec<String> {
        let first = records.column_values(field_a);
        let second = records.column_values(field_b);

        first
            .into_iter()
            .zip(second)
            .map(|(a, b)| {
                format!(
                    "{} {}",
                    a.map(str::trim).unwrap_or(""),
                    b.map(str::trim).unwrap_or("")
                )
            })
            .collect()
    }
}

/// Text preprocessing utilities
pub struct TextPreprocessor;

impl TextPreprocessor {
    /// Lowercase and split into tokens of two or more word characters
    pub fn tokenize(text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Tokens with English stop words removed
    pub fn terms(text: &str) -> Vec<String> {
        Self::tokenize(text)
            .into_iter()
            .filter(|t| !is_stop_word(t))
            .collect()
    }
}

/// TF-IDF vectorizer over a fixed-size vocabulary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Configuration
    config: VectorizerConfig,

    /// Terms in column order (alphabetical)
    vocabulary: Vec<String>,

    /// Term -> column index
    index: HashMap<String, usize>,

    /// Smoothed inverse document frequency per column
    idf: Array1<f64>,

    /// Is fitted (vocabulary built)
    is_fitted: bool,
}

impl TfidfVectorizer {
    /// Create a new vectorizer
    pub fn new(config: VectorizerConfig) -> Self {
        Self {
            config,
            vocabulary: Vec::new(),
            index: HashMap::new(),
            idf: Array1::zeros(0),
            is_fitted: false,
        }
    }

    /// Build the vocabulary and IDF weights from a corpus
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        let mut term_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();

        for document in documents {
            let terms = TextPreprocessor::terms(document);
            let unique: BTreeSet<&String> = terms.iter().collect();
            for term in unique {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *term_counts.entry(term).or_insert(0) += 1;
            }
        }

        // Most frequent terms first; the stable sort keeps alphabetical order among ties
        let mut ranked: Vec<(String, usize)> = term_counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(self.config.max_features);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort();

        let n_docs = documents.len() as f64;
        self.idf = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        self.index = vocabulary
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();
        self.vocabulary = vocabulary;
        self.is_fitted = true;

        Ok(())
    }

    /// Transform documents into an L2-normalised TF-IDF matrix (n_documents × vocab_size)
    pub fn transform(&self, documents: &[String]) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(AppError::Internal(
                "TfidfVectorizer must be fitted before transform".to_string(),
            ));
        }

        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));

        for (row, document) in documents.iter().enumerate() {
            for term in TextPreprocessor::terms(document) {
                if let Some(&col) = self.index.get(&term) {
                    matrix[[row, col]] += 1.0;
                }
            }

            let mut values = matrix.row_mut(row);
            values *= &self.idf;
            let norm = values.dot(&values).sqrt();
            if norm > 0.0 {
                values /= norm;
            }
        }

        Ok(matrix)
    }

    /// Fit and transform in one step
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Array2<f64>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    /// Terms in column order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Get vocabulary size
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// IDF weight per column
    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    /// Check if fitted
    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_text_combiner() {
        let records = RecordSet::from_rows(
            vec!["title".to_string(), "description".to_string()],
            vec![
                vec!["  Login page ".to_string(), " broken ".to_string()],
                vec!["Search".to_string(), "".to_string()],
                vec!["null".to_string(), "Crash".to_string()],
            ],
        )
        .unwrap();

        let combined = TextCombiner::combine(&records, "title", "description");
        assert_eq!(combined, vec!["Login page broken", "Search ", " Crash"]);

        let missing = TextCombiner::combine(&records, "title", "summary");
        assert_eq!(missing[0], "Login page ");
    }

    #[test]
    fn test_tokenize() {
        let tokens = TextPreprocessor::tokenize("OAuth-login fails: 500 error, a b");
        assert_eq!(tokens, vec!["oauth", "login", "fails", "500", "error"]);
    }

    #[test]
    fn test_terms_drop_stop_words() {
        let terms = TextPreprocessor::terms("The database is down again");
        assert_eq!(terms, vec!["database"]);
    }

    #[test]
    fn test_transform_requires_fit() {
        let vectorizer = TfidfVectorizer::new(VectorizerConfig::default());
        assert!(!vectorizer.is_fitted());
        assert!(vectorizer.transform(&docs(&["login"])).is_err());
    }

    #[test]
    fn test_vocabulary_limited_to_most_frequent_terms() {
        let corpus = docs(&[
            "database timeout database",
            "database latency",
            "payment timeout",
        ]);
        let mut vectorizer = TfidfVectorizer::new(VectorizerConfig { max_features: 2 });
        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        assert_eq!(vectorizer.vocabulary(), &["database", "timeout"]);
        assert_eq!(matrix.shape(), &[3, 2]);
    }

    #[test]
    fn test_rows_are_l2_normalised() {
        let corpus = docs(&["login broken", "checkout broken broken", "export"]);
        let mut vectorizer = TfidfVectorizer::new(VectorizerConfig::default());
        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        for row in matrix.rows() {
            let norm = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_smoothed_idf() {
        let corpus = docs(&["login", "login", "checkout"]);
        let mut vectorizer = TfidfVectorizer::new(VectorizerConfig::default());
        vectorizer.fit(&corpus).unwrap();

        // checkout: ln(4/2) + 1, login: ln(4/3) + 1
        let idf = vectorizer.idf();
        assert!((idf[0] - ((4.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
        assert!((idf[1] - ((4.0f64 / 3.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_empty_documents_give_zero_matrix() {
        let corpus = docs(&[" ", "the a", ""]);
        let mut vectorizer = TfidfVectorizer::new(VectorizerConfig::default());
        let matrix = vectorizer.fit_transform(&corpus).unwrap();

        assert_eq!(vectorizer.vocab_size(), 0);
        assert_eq!(matrix.shape(), &[3, 0]);
        assert!(matrix.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let corpus = docs(&["login broken", "checkout slow", "login slow"]);
        let a = TfidfVectorizer::new(VectorizerConfig::default())
            .fit_transform(&corpus)
            .unwrap();
        let b = TfidfVectorizer::new(VectorizerConfig::default())
            .fit_transform(&corpus)
            .unwrap();
        assert_eq!(a, b);
    }
}
