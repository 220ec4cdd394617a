//! HTTP API over the finvest workflow and document store
//!
//! Exposes user and conversation CRUD plus the `/analyze` endpoint that
//! runs a query through the research workflow and records the exchange.

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, Result};
pub use routes::router;
pub use state::AppState;
