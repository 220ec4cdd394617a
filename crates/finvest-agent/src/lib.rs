//! Financial research workflow for a fixed set of Indian listed companies
//!
//! A query runs through a fixed, acyclic pipeline:
//!
//! 1. Intent extraction: detect companies and pick an analysis type
//! 2. Validation: reject queries naming no supported company
//! 3. Gated fetching: screener extraction, news search, transcript
//!    summarization, site crawling, or document mapping, per type
//! 4. Synthesis: one LLM report per company, plus a ranking pass for
//!    comparative requests
//!
//! Every collaborator sits behind a trait (`SearchApi`, `DocumentReader`,
//! `LLMProvider`), so the whole pipeline runs against doubles in tests.
//! [`WorkflowController::from_config`] wires the production set.

pub mod config;
pub mod error;
pub mod fetch;
pub mod intent;
pub mod prompts;
pub mod state;
pub mod synthesize;
pub mod transcript;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testkit;

pub use config::{FinvestConfig, FinvestConfigBuilder};
pub use error::{AgentError, Result};
pub use fetch::DataFetchers;
pub use intent::IntentExtractor;
pub use state::AnalysisState;
pub use synthesize::Synthesizer;
pub use transcript::TranscriptAnalyzer;
pub use workflow::WorkflowController;
