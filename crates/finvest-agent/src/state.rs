//! Workflow state carried between pipeline stages
//!
//! Each fetch stage produces a per-company map of outcomes; stages never
//! mutate the state they receive, they return a new state with one field
//! replaced. Keys are company display names.

use finvest_core::{AnalysisRequest, FetchOutcome};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Extracted financial statement content for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialData {
    pub company: String,
    pub url: String,
    pub content: String,
}

/// One news article hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// Aggregated news results for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsData {
    pub company: String,
    pub results: Vec<NewsArticle>,
    pub total_found: usize,
}

/// Earnings call transcript location and LLM summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptData {
    pub company: String,
    pub transcript_url: String,
    pub summary: String,
}

/// One crawled page from a company website
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub content: String,
}

/// Crawled investor-relations content for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebsiteData {
    pub company: String,
    pub pages: Vec<CrawledPage>,
}

/// URL structure discovered under one financial resource site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappedSite {
    pub base_url: String,
    pub discovered_urls: Vec<String>,
}

/// Mapped financial resource sites for one company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesData {
    pub company: String,
    pub sites: Vec<MappedSite>,
}

/// Per-company fetch outcomes, keyed by display name
pub type SourceMap<T> = HashMap<String, FetchOutcome<T>>;

/// Accumulated state for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisState {
    pub request: AnalysisRequest,
    pub financial: SourceMap<FinancialData>,
    pub news: SourceMap<NewsData>,
    pub transcript: SourceMap<TranscriptData>,
    pub website: SourceMap<WebsiteData>,
    pub resources: SourceMap<ResourcesData>,
    pub error_message: Option<String>,
}

impl AnalysisState {
    /// Start a fresh state from an extracted request
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            request,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_financial(mut self, financial: SourceMap<FinancialData>) -> Self {
        self.financial = financial;
        self
    }

    #[must_use]
    pub fn with_news(mut self, news: SourceMap<NewsData>) -> Self {
        self.news = news;
        self
    }

    #[must_use]
    pub fn with_transcript(mut self, transcript: SourceMap<TranscriptData>) -> Self {
        self.transcript = transcript;
        self
    }

    #[must_use]
    pub fn with_website(mut self, website: SourceMap<WebsiteData>) -> Self {
        self.website = website;
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: SourceMap<ResourcesData>) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}
