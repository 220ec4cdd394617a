//! Intent extraction: company detection and analysis-type selection
//!
//! The analysis type is selected by an ordered priority chain; the first
//! rule whose predicate holds wins and no further rules are evaluated.
//! Queries routinely match several keyword sets (e.g. "news" and
//! "financial"), so the rule order is a load-bearing contract, not an
//! implementation detail.

use finvest_core::{AnalysisRequest, AnalysisType, CompanyRegistry};
use std::sync::Arc;

/// Trigger terms that fall back to the full registry when no company
/// matched. Over-triggers on generic wording like "all"; callers rely on
/// the validator to reject anything that still ends up empty.
const COMPARE_ALL_TRIGGERS: &[&str] = &["all", "compare", "comparison", "vs", "versus"];

/// Comparison keywords for analysis-type rule 6
const COMPARISON_KEYWORDS: &[&str] = &["compare", "comparison", "vs", "versus"];

fn matches_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| query.contains(kw))
}

/// Extracts the company set and analysis type from a free-text query
#[derive(Debug, Clone)]
pub struct IntentExtractor {
    registry: Arc<CompanyRegistry>,
}

impl IntentExtractor {
    /// Create a new intent extractor over a company registry
    pub fn new(registry: Arc<CompanyRegistry>) -> Self {
        Self { registry }
    }

    /// Classify a query into detected companies and an analysis type
    pub fn extract(&self, query: &str) -> AnalysisRequest {
        let query_lower = query.to_lowercase();

        let mut companies = self.registry.detect(query);

        // Comparative-intent fallback: no company named, but the query asks
        // for a comparison -> analyze the whole registry.
        if companies.is_empty() && matches_any(&query_lower, COMPARE_ALL_TRIGGERS) {
            companies = self.registry.records().to_vec();
        }

        let analysis_type = Self::select_type(&query_lower, companies.len());
        tracing::debug!(
            %analysis_type,
            companies = companies.len(),
            "Classified query intent"
        );

        AnalysisRequest {
            raw_query: query.to_string(),
            companies,
            analysis_type,
        }
    }

    /// Ordered priority chain for analysis-type selection
    ///
    /// First matching rule wins:
    /// 1. "news" without financial/transcript/website -> NEWS
    /// 2. transcript/earnings/concall -> TRANSCRIPT
    /// 3. financial/ratios/balance sheet -> FINANCIAL
    /// 4. website/crawl -> WEBSITE
    /// 5. resources/map/documents -> RESOURCES
    /// 6. comparison keyword with more than one company -> COMPARATIVE
    /// 7. full/complete/comprehensive -> FULL
    /// 8. default -> FULL
    fn select_type(query_lower: &str, company_count: usize) -> AnalysisType {
        if query_lower.contains("news")
            && !matches_any(query_lower, &["financial", "transcript", "website"])
        {
            AnalysisType::News
        } else if matches_any(query_lower, &["transcript", "earnings", "concall"]) {
            AnalysisType::Transcript
        } else if matches_any(query_lower, &["financial", "ratios", "balance sheet"]) {
            AnalysisType::Financial
        } else if matches_any(query_lower, &["website", "crawl"]) {
            AnalysisType::Website
        } else if matches_any(query_lower, &["resources", "map", "documents"]) {
            AnalysisType::Resources
        } else if matches_any(query_lower, COMPARISON_KEYWORDS) && company_count > 1 {
            AnalysisType::Comparative
        } else {
            // Rules 7 and 8 both resolve to FULL
            AnalysisType::Full
        }
    }
}
