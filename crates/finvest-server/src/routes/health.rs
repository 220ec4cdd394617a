//! Liveness endpoints

use crate::state::{APP_NAME, APP_VERSION};
use axum::Json;
use serde_json::{json, Value};

/// Root endpoint: service identity
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": APP_NAME,
        "version": APP_VERSION,
        "status": "running",
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    tracing::debug!("Health check endpoint called");
    Json(json!({
        "status": "healthy",
        "app": APP_NAME,
        "version": APP_VERSION,
    }))
}
