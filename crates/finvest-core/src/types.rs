//! Analysis request and fetch outcome types

use crate::registry::CompanyRecord;
use serde::{Deserialize, Serialize};

/// The kind of report requested by a query
///
/// Exactly one value is selected per request by an ordered priority chain in
/// the intent extractor; see `finvest-agent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Financial,
    News,
    Transcript,
    Website,
    Resources,
    #[default]
    Full,
    Comparative,
}

impl AnalysisType {
    /// Stable lowercase name, used in logs and prompt selection
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Financial => "financial",
            Self::News => "news",
            Self::Transcript => "transcript",
            Self::Website => "website",
            Self::Resources => "resources",
            Self::Full => "full",
            Self::Comparative => "comparative",
        }
    }

    /// Whether this type runs the financial -> news -> transcript chain
    pub fn runs_financial_chain(&self) -> bool {
        matches!(self, Self::Full | Self::Comparative)
    }

    /// Whether the financial fetcher applies to this type
    pub fn needs_financial(&self) -> bool {
        matches!(self, Self::Financial) || self.runs_financial_chain()
    }

    /// Whether the news fetcher applies to this type
    pub fn needs_news(&self) -> bool {
        matches!(self, Self::News) || self.runs_financial_chain()
    }

    /// Whether the transcript fetcher applies to this type
    pub fn needs_transcript(&self) -> bool {
        matches!(self, Self::Transcript) || self.runs_financial_chain()
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One query's detected companies and selected analysis type
///
/// Built once per request by the intent extractor and discarded after the
/// final report is produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The query as the user typed it
    pub raw_query: String,
    /// Detected companies, registry order preserved
    pub companies: Vec<CompanyRecord>,
    /// Selected analysis type
    pub analysis_type: AnalysisType,
}

impl AnalysisRequest {
    /// Whether any company was detected
    pub fn has_companies(&self) -> bool {
        !self.companies.is_empty()
    }
}

/// Per-company, per-source fetch result
///
/// Fetchers never raise past their own loop iteration: every failure is
/// captured here as data so one company's failure cannot abort another's.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum FetchOutcome<T> {
    /// Retrieval succeeded with a source-specific payload
    Success { payload: T },
    /// Retrieval failed; the description replaces the payload
    Failure { error: String },
}

impl<T> FetchOutcome<T> {
    /// Wrap a payload as a success
    pub fn success(payload: T) -> Self {
        Self::Success { payload }
    }

    /// Capture an error description as a failure
    pub fn failure(error: impl Into<String>) -> Self {
        Self::Failure {
            error: error.into(),
        }
    }

    /// The payload, when the fetch succeeded
    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Success { payload } => Some(payload),
            Self::Failure { .. } => None,
        }
    }

    /// The captured error, when the fetch failed
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Whether the fetch succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl<T> From<std::result::Result<T, String>> for FetchOutcome<T> {
    fn from(result: std::result::Result<T, String>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(error) => Self::failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_type_gating() {
        assert!(AnalysisType::Financial.needs_financial());
        assert!(!AnalysisType::Financial.needs_news());
        assert!(AnalysisType::Full.needs_financial());
        assert!(AnalysisType::Full.needs_news());
        assert!(AnalysisType::Full.needs_transcript());
        assert!(AnalysisType::Comparative.runs_financial_chain());
        assert!(!AnalysisType::Website.needs_financial());
        assert!(!AnalysisType::Resources.needs_transcript());
    }

    #[test]
    fn test_fetch_outcome_accessors() {
        let ok: FetchOutcome<String> = FetchOutcome::success("data".to_string());
        assert!(ok.is_success());
        assert_eq!(ok.payload().map(String::as_str), Some("data"));
        assert!(ok.error().is_none());

        let err: FetchOutcome<String> = FetchOutcome::failure("request timed out");
        assert!(!err.is_success());
        assert_eq!(err.error(), Some("request timed out"));
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_fetch_outcome_serialization_tags() {
        let ok: FetchOutcome<u32> = FetchOutcome::success(7);
        let json = serde_json::to_value(&ok).expect("serialize");
        assert_eq!(json["status"], "success");

        let err: FetchOutcome<u32> = FetchOutcome::failure("boom");
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error"], "boom");
    }
}
