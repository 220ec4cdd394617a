//! Error types for the persistence layer

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Message payload could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A uniqueness constraint would be violated
    #[error("{0}")]
    Conflict(String),

    /// Email/password pair did not match a user
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The connection mutex was poisoned by a panicking writer
    #[error("Store connection is no longer usable")]
    ConnectionPoisoned,
}
