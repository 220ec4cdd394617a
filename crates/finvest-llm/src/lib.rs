//! LLM provider abstraction layer for finvest
//!
//! This crate provides provider-agnostic abstractions for the two generative
//! services the research workflow delegates to:
//!
//! - Message and completion request/response types
//! - The `LLMProvider` trait
//! - Concrete provider implementations behind feature flags
//!   (`gemini` for report synthesis, `groq` for transcript summarization)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "gemini", feature = "groq"))]
pub mod providers;
