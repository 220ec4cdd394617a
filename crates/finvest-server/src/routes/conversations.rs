//! Conversation CRUD

use crate::error::Result;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use finvest_store::Conversation;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    pub user_id: String,
}

/// POST /conversations?user_id=...
pub async fn create_conversation(
    State(state): State<AppState>,
    Query(params): Query<OwnerParams>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<Conversation>> {
    let conversation = state
        .store
        .create_conversation(&params.user_id, request.title)?;
    Ok(Json(conversation))
}

/// GET /conversations/:conversation_id
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Conversation>> {
    let conversation = state.store.get_conversation(&conversation_id)?;
    Ok(Json(conversation))
}

/// PUT /conversations/:conversation_id
pub async fn update_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<Value>> {
    state
        .store
        .rename_conversation(&conversation_id, request.title)?;
    Ok(Json(json!({ "message": "Conversation updated successfully" })))
}

/// DELETE /conversations/:conversation_id
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> Result<Json<Value>> {
    state.store.delete_conversation(&conversation_id)?;
    Ok(Json(json!({ "message": "Conversation deleted successfully" })))
}
