//! Shared application state

use finvest_agent::WorkflowController;
use finvest_store::DocumentStore;
use std::sync::Arc;

pub const APP_NAME: &str = "Financial Analysis Agent API";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
    pub controller: Arc<WorkflowController>,
}

impl AppState {
    pub fn new(store: DocumentStore, controller: Arc<WorkflowController>) -> Self {
        Self { store, controller }
    }
}
