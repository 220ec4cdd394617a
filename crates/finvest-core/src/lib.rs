//! Core domain types for finvest
//!
//! This crate holds the leaf types shared across the workspace:
//!
//! - The fixed company registry (display names, tickers, data-source URLs,
//!   alias search terms)
//! - The analysis-type taxonomy selected per request
//! - The per-company fetch outcome union (success payload or captured error)
//!
//! Nothing here performs I/O. External clients live in `finvest-search` and
//! `finvest-llm`; the orchestration lives in `finvest-agent`.

pub mod error;
pub mod registry;
pub mod types;

pub use error::{Error, Result};
pub use registry::{CompanyRecord, CompanyRegistry};
pub use types::{AnalysisRequest, AnalysisType, FetchOutcome};
