//! Fixed registry of supported companies
//!
//! The registry is constructed once at process start and passed explicitly
//! into the workflow; it is never mutated afterwards. Detection is plain
//! case-insensitive substring matching against a lowercased query, with no
//! tokenization and no fuzzy matching.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single supported company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Short registry key (e.g. "pfc")
    pub key: String,
    /// Canonical display name used in reports and fetch-result maps
    pub display_name: String,
    /// Exchange ticker symbol
    pub ticker: String,
    /// Canonical financial-data page for this company
    pub screener_url: String,
    /// Alias terms the query may use instead of name or ticker
    pub search_terms: Vec<String>,
}

impl CompanyRecord {
    /// Check whether a lowercased query mentions this company
    ///
    /// Matches on ticker, display name, or any alias term.
    pub fn matches(&self, query_lower: &str) -> bool {
        query_lower.contains(&self.ticker.to_lowercase())
            || query_lower.contains(&self.display_name.to_lowercase())
            || self
                .search_terms
                .iter()
                .any(|term| query_lower.contains(&term.to_lowercase()))
    }
}

/// Ordered collection of supported companies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRegistry {
    records: Vec<CompanyRecord>,
}

impl CompanyRegistry {
    /// Build a registry from an explicit record list
    pub fn new(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    /// The standard registry of supported companies
    pub fn standard() -> Self {
        let record = |key: &str, name: &str, ticker: &str, terms: &[&str]| CompanyRecord {
            key: key.to_string(),
            display_name: name.to_string(),
            ticker: ticker.to_string(),
            screener_url: format!("https://www.screener.in/company/{ticker}/consolidated/"),
            search_terms: terms.iter().map(|t| (*t).to_string()).collect(),
        };

        Self::new(vec![
            record(
                "pfc",
                "Power Finance Corporation",
                "PFC",
                &["Power Finance Corporation", "PFC Limited", "PFC India"],
            ),
            record(
                "rec",
                "Rural Electrification Corporation",
                "RECLTD",
                &[
                    "Rural Electrification Corporation",
                    "REC Limited",
                    "REC India",
                ],
            ),
            record(
                "reliance",
                "Reliance Industries Limited",
                "RELIANCE",
                &["Reliance Industries", "RIL", "Mukesh Ambani"],
            ),
            record(
                "adani_green",
                "Adani Green Energy Limited",
                "ADANIGREEN",
                &["Adani Green Energy", "AGEL", "Adani Green"],
            ),
            record(
                "hdfc_bank",
                "HDFC Bank Limited",
                "HDFCBANK",
                &["HDFC Bank", "HDFCBANK", "HDFC Banking"],
            ),
        ])
    }

    /// All registry records in declaration order
    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    /// Look up a record by registry key
    pub fn get(&self, key: &str) -> Result<&CompanyRecord> {
        self.records
            .iter()
            .find(|r| r.key == key)
            .ok_or_else(|| Error::UnknownCompany(key.to_string()))
    }

    /// Companies mentioned in the query, in registry order
    pub fn detect(&self, query: &str) -> Vec<CompanyRecord> {
        let query_lower = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.matches(&query_lower))
            .cloned()
            .collect()
    }

    /// Comma-separated display names, used by the validation message
    pub fn display_names(&self) -> String {
        self.records
            .iter()
            .map(|r| r.display_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of registered companies
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
