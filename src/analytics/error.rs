//! Error types for analytics operations

use crate::error::AppError;

/// Result type for analytics operations
pub type AnalyticsResult<T> = std::result::Result<T, AnalyticsError>;

/// Errors that can occur in analytics operations
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Insufficient data for analysis
    #[error("Insufficient data for analysis: {0}")]
    InsufficientData(String),

    /// Scores or labels do not line up with the records
    #[error("Length mismatch: expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Calculation error
    #[error("Calculation error: {0}")]
    CalculationError(String),
}

impl From<AnalyticsError> for AppError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::LengthMismatch { .. } => AppError::Internal(err.to_string()),
            _ => AppError::Processing(err.to_string()),
        }
    }
}
