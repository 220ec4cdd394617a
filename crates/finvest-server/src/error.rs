//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finvest_agent::AgentError;
use finvest_store::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors a handler can surface to the client
#[derive(Debug, Error)]
pub enum ApiError {
    /// Persistence failure or missing record
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Workflow machinery failure
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// Request body failed validation
    #[error("{0}")]
    Validation(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Store(StoreError::NotFound(resource)) => {
                (StatusCode::NOT_FOUND, format!("{resource} not found"))
            }
            ApiError::Store(StoreError::Conflict(message)) => (StatusCode::BAD_REQUEST, message),
            ApiError::Store(StoreError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "Invalid email or password".to_string(),
            ),
            ApiError::Store(e) => {
                error!(error = %e, "Store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error".to_string(),
                )
            }
            ApiError::Agent(e) => {
                error!(error = %e, "Workflow failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Analysis failed".to_string(),
                )
            }
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));
        (status, body).into_response()
    }
}
