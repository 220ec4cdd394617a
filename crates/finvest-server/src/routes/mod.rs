//! Route handlers and router assembly

pub mod analysis;
pub mod conversations;
pub mod health;
pub mod users;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        .route("/users/signup", post(users::signup))
        .route("/users/signin", post(users::signin))
        .route("/users/:user_id", get(users::get_user))
        .route(
            "/users/:user_id/conversations",
            get(users::list_user_conversations),
        )
        .route("/conversations", post(conversations::create_conversation))
        .route(
            "/conversations/:conversation_id",
            get(conversations::get_conversation)
                .put(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
        .route("/analyze", post(analysis::analyze))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
