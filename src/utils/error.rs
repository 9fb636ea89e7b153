use thiserror::Error;

/// Rejection of a raw filter value by a definition's rule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct ValidationError {
    /// Human-readable, already translated reason
    pub reason: String,
}

impl ValidationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A raw value failed its definition's validation rule
    #[error("Invalid value: {0}")]
    Validation(#[from] ValidationError),

    /// The filter catalog is malformed (programming defect, fatal at startup)
    #[error("Catalog configuration error: {0}")]
    Catalog(String),

    /// The same value is already set under the same definition and negation
    #[error("Filter already exists")]
    DuplicateFilter,

    /// No definition with this id in the catalog
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// Error from I/O operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    GenericError(String),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;
