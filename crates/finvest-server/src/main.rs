//! HTTP server entry point

use finvest_agent::{FinvestConfig, WorkflowController};
use finvest_server::{router, AppState};
use finvest_store::DocumentStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    finvest_utils::init_tracing();

    let config = FinvestConfig::builder().with_env_keys().build()?;
    let controller = Arc::new(WorkflowController::from_config(config)?);

    let db_path = std::env::var("FINVEST_DB").unwrap_or_else(|_| "finvest.db".to_string());
    let store = DocumentStore::open(&db_path)?;

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8000".to_string());
    let addr = format!("{host}:{port}");

    let app = router(AppState::new(store, controller));
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
