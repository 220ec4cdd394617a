//! Tavily API client
//!
//! Wraps the four endpoints the workflow uses: search, extract, crawl, and
//! map. Every call is a single POST; the client applies per-minute rate
//! limiting but no retries -- fetch-stage fault tolerance lives in the
//! workflow, which captures per-company errors as data.

use crate::error::{Result, SearchError};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::instrument;

const TAVILY_API_BASE: &str = "https://api.tavily.com";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Search request parameters
#[derive(Debug, Clone, Serialize)]
pub struct SearchRequest {
    /// Query string
    pub query: String,
    /// Topic filter ("news" or "general")
    pub topic: String,
    /// Search depth ("basic" or "advanced")
    pub search_depth: String,
    /// Maximum results to return
    pub max_results: usize,
    /// Restrict to articles from the last N days (news topic only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    /// Include a synthesized answer
    pub include_answer: bool,
    /// Include raw page content in results
    pub include_raw_content: bool,
}

impl SearchRequest {
    /// A basic-depth search with no news window
    pub fn basic(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            topic: "general".to_string(),
            search_depth: "basic".to_string(),
            max_results,
            days: None,
            include_answer: false,
            include_raw_content: false,
        }
    }

    /// An advanced-depth news search over a trailing day window
    pub fn news(query: impl Into<String>, days: u32, max_results: usize) -> Self {
        Self {
            query: query.into(),
            topic: "news".to_string(),
            search_depth: "advanced".to_string(),
            max_results,
            days: Some(days),
            include_answer: true,
            include_raw_content: true,
        }
    }
}

/// One search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub raw_content: Option<String>,
}

/// Search endpoint response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// One extracted page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    pub url: String,
    #[serde(default)]
    pub raw_content: String,
}

/// Extract endpoint response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub results: Vec<ExtractedPage>,
}

/// Crawl request parameters
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRequest {
    /// Root URL to crawl
    pub url: String,
    /// Maximum link depth from the root
    pub max_depth: u32,
    /// Maximum links followed per page
    pub max_breadth: u32,
    /// Overall page limit
    pub limit: u32,
    /// Natural-language crawl focus
    pub instructions: String,
}

/// Crawl endpoint response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlResponse {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub results: Vec<ExtractedPage>,
}

/// Map request parameters
#[derive(Debug, Clone, Serialize)]
pub struct MapRequest {
    /// Root URL to map
    pub url: String,
    /// Maximum link depth from the root
    pub max_depth: u32,
    /// Maximum links followed per page
    pub max_breadth: u32,
    /// Overall URL limit
    pub limit: u32,
    /// Natural-language mapping focus
    pub instructions: String,
}

/// Map endpoint response: discovered URLs under a base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapResponse {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub results: Vec<String>,
}

/// The retrieval API surface the workflow depends on
///
/// `TavilyClient` is the production implementation; tests substitute doubles
/// so fetch behavior is deterministic.
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Web/news search
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse>;

    /// Extract page content from explicit URLs
    async fn extract(&self, urls: &[String]) -> Result<ExtractResponse>;

    /// Crawl a site subtree
    async fn crawl(&self, request: CrawlRequest) -> Result<CrawlResponse>;

    /// Map a site's document URLs without extracting content
    async fn map(&self, request: MapRequest) -> Result<MapResponse>;
}

/// Tavily client with per-minute rate limiting
pub struct TavilyClient {
    client: Client,
    api_key: String,
    rate_limiter: SharedRateLimiter,
}

impl TavilyClient {
    /// Create a new Tavily client
    ///
    /// # Arguments
    /// * `api_key` - Tavily API key
    /// * `rate_limit` - Requests per minute
    pub fn new(api_key: impl Into<String>, rate_limit: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit.max(1)).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            rate_limiter,
        }
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<R> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .post(format!("{TAVILY_API_BASE}/{endpoint}"))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| SearchError::ApiError(format!("Tavily request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(format!(
                "Tavily API error {status}: {body}"
            )));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| SearchError::ApiError(format!("Failed to parse Tavily response: {e}")))
    }
}

#[async_trait]
impl SearchApi for TavilyClient {
    #[instrument(skip(self, request), fields(query = %request.query))]
    async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
        self.post("search", &request).await
    }

    #[instrument(skip(self))]
    async fn extract(&self, urls: &[String]) -> Result<ExtractResponse> {
        #[derive(Serialize)]
        struct ExtractRequest<'a> {
            urls: &'a [String],
            extract_depth: &'a str,
            format: &'a str,
        }

        self.post(
            "extract",
            &ExtractRequest {
                urls,
                extract_depth: "advanced",
                format: "markdown",
            },
        )
        .await
    }

    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn crawl(&self, request: CrawlRequest) -> Result<CrawlResponse> {
        self.post("crawl", &request).await
    }

    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn map(&self, request: MapRequest) -> Result<MapResponse> {
        self.post("map", &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TavilyClient::new("test_key", 60);
        assert_eq!(client.api_key, "test_key");
    }

    #[test]
    fn test_news_request_defaults() {
        let req = SearchRequest::news("PFC latest news", 30, 3);
        assert_eq!(req.topic, "news");
        assert_eq!(req.search_depth, "advanced");
        assert_eq!(req.days, Some(30));
        assert!(req.include_raw_content);
    }

    #[test]
    fn test_basic_request_defaults() {
        let req = SearchRequest::basic("investor relations", 5);
        assert_eq!(req.topic, "general");
        assert!(req.days.is_none());
        assert!(!req.include_raw_content);
    }

    #[test]
    fn test_search_response_tolerates_missing_fields() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(parsed.results.is_empty());
        assert!(parsed.answer.is_none());
    }
}
