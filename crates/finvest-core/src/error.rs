//! Error types for finvest-core

use thiserror::Error;

/// Result type alias for finvest-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown company key requested from the registry
    #[error("Unknown company key: {0}")]
    UnknownCompany(String),
}
