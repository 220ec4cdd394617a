//! Error types for the research workflow

use thiserror::Error;

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Workflow-level errors
///
/// Per-company fetch failures never surface here; they are captured as
/// `FetchOutcome::Failure` data inside the analysis state. These variants
/// cover failures of the workflow machinery itself.
#[derive(Debug, Error)]
pub enum AgentError {
    /// LLM layer error
    #[error("LLM error: {0}")]
    Llm(#[from] finvest_llm::LLMError),

    /// Retrieval layer error
    #[error("Search error: {0}")]
    Search(#[from] finvest_search::SearchError),

    /// The stage loop ran more transitions than the configured limit
    #[error("Workflow exceeded its step budget of {budget} steps")]
    StepBudgetExceeded { budget: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
