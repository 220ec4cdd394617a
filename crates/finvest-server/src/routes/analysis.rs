//! The analysis endpoint: run a query and persist the exchange

use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const QUERY_MAX_LEN: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub query: String,
    pub user_id: String,
    pub conversation_id: Option<String>,
}

/// POST /analyze
///
/// Runs the workflow and appends the query/report pair to the target
/// conversation, creating one when none is given. The caller is checked
/// before the (slow) analysis starts.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<Value>> {
    if request.query.trim().is_empty() {
        return Err(ApiError::Validation("query must not be empty".to_string()));
    }
    if request.query.chars().count() > QUERY_MAX_LEN {
        return Err(ApiError::Validation(format!(
            "query must be at most {QUERY_MAX_LEN} characters"
        )));
    }

    match request.conversation_id.as_deref() {
        Some(id) => {
            state.store.get_conversation(id)?;
        }
        None => {
            state.store.get_user(&request.user_id)?;
        }
    }

    info!(user_id = %request.user_id, "Received analysis request");
    let report = state.controller.analyze(&request.query).await;

    let conversation = state.store.record_exchange(
        &request.user_id,
        request.conversation_id.as_deref(),
        &request.query,
        &report,
    )?;

    Ok(Json(json!({
        "status": "success",
        "message": "Analysis completed successfully",
        "data": report,
        "conversation_id": conversation.id,
    })))
}
