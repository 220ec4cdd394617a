//! Shared utilities for the finvest workspace

pub mod logging;

pub use logging::init_tracing;
