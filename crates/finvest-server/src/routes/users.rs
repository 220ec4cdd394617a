//! User registration, sign-in, and lookup

use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use finvest_store::{ConversationSummary, User};
use serde::{Deserialize, Serialize};
use tracing::info;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 50;
const PASSWORD_MIN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub message: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

fn validate_signup(request: &SignupRequest) -> Result<()> {
    let username_len = request.username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&username_len) {
        return Err(ApiError::Validation(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    if !request.email.contains('@') {
        return Err(ApiError::Validation("email is not valid".to_string()));
    }
    if request.password.chars().count() < PASSWORD_MIN {
        return Err(ApiError::Validation(format!(
            "password must be at least {PASSWORD_MIN} characters"
        )));
    }
    Ok(())
}

/// POST /users/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<UserResponse>> {
    validate_signup(&request)?;
    let user = state
        .store
        .create_user(&request.username, &request.email, &request.password)?;
    info!(user_id = %user.id, "Created user");
    Ok(Json(user.into()))
}

/// POST /users/signin
pub async fn signin(
    State(state): State<AppState>,
    Json(request): Json<SigninRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .store
        .verify_credentials(&request.email, &request.password)?;
    Ok(Json(LoginResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        message: "Login successful".to_string(),
    }))
}

/// GET /users/:user_id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.store.get_user(&user_id)?;
    Ok(Json(user.into()))
}

/// GET /users/:user_id/conversations
pub async fn list_user_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<ConversationSummary>>> {
    let summaries = state.store.list_conversations(&user_id)?;
    Ok(Json(summaries))
}
