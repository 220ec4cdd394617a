//! Error types for retrieval operations

use thiserror::Error;

/// Result type alias for retrieval operations
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors from the search API and document extraction
#[derive(Debug, Error)]
pub enum SearchError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Document download or text extraction failed
    #[error("Document error: {0}")]
    DocumentError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
