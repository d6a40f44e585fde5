use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Input is not table-shaped or cannot be parsed as CSV
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Processing errors
    #[error("Processing error: {0}")]
    Processing(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 65,
            AppError::Validation(_) => 64,
            AppError::Configuration(_) => 78,
            AppError::Io(_) => 74,
            AppError::Serialization(_) => 70,
            AppError::Processing(_) => 70,
            AppError::Internal(_) => 70,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Processing(_) => "PROCESSING_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error is caused by the data handed to the engine
    pub fn is_input_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

/// Conversion from csv::Error
///
/// Parse failures and ragged rows are input errors; a failing writer is not.
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(_) => AppError::Serialization(err.to_string()),
            _ => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
