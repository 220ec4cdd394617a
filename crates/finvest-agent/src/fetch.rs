//! Per-company data fetchers
//!
//! Each fetcher takes the full request and returns a map of per-company
//! outcomes. Gating lives here: a fetcher whose source does not apply to the
//! requested analysis type returns an empty map. Within a fetcher, one
//! company's failure is captured as a `FetchOutcome::Failure` entry and the
//! remaining companies still run.

use crate::config::FinvestConfig;
use crate::state::{
    CrawledPage, FinancialData, MappedSite, NewsArticle, NewsData, ResourcesData, SourceMap,
    TranscriptData, WebsiteData,
};
use crate::transcript::TranscriptAnalyzer;
use finvest_core::{AnalysisRequest, AnalysisType, CompanyRecord};
use finvest_search::{CrawlRequest, MapRequest, SearchApi, SearchRequest};
use std::sync::Arc;
use tracing::{instrument, warn};

const NEWS_QUERY_COUNT: usize = 3;
const WEBSITE_URL_KEYWORDS: &[&str] = &["investor", "annual", "financial", "results"];

/// Extract the screener page for one company
///
/// Shared between the financial fetcher and the transcript analyzer, which
/// needs the page content to locate the transcript link.
pub(crate) async fn extract_financial(
    search: &dyn SearchApi,
    company: &CompanyRecord,
) -> Result<FinancialData, String> {
    let response = search
        .extract(std::slice::from_ref(&company.screener_url))
        .await
        .map_err(|e| format!("Failed to extract financial data: {e}"))?;

    let page = response
        .results
        .into_iter()
        .next()
        .filter(|page| !page.raw_content.is_empty())
        .ok_or_else(|| "No financial data extracted".to_string())?;

    Ok(FinancialData {
        company: company.display_name.clone(),
        url: company.screener_url.clone(),
        content: page.raw_content,
    })
}

/// The five data sources, gated by analysis type
pub struct DataFetchers {
    search: Arc<dyn SearchApi>,
    transcripts: TranscriptAnalyzer,
    config: FinvestConfig,
}

impl DataFetchers {
    /// Create the fetcher set
    pub fn new(
        search: Arc<dyn SearchApi>,
        transcripts: TranscriptAnalyzer,
        config: FinvestConfig,
    ) -> Self {
        Self {
            search,
            transcripts,
            config,
        }
    }

    /// Screener page extraction for every requested company
    #[instrument(skip_all, fields(companies = request.companies.len()))]
    pub async fn fetch_financial(&self, request: &AnalysisRequest) -> SourceMap<FinancialData> {
        let mut outcomes = SourceMap::new();
        if !request.analysis_type.needs_financial() {
            return outcomes;
        }

        for company in &request.companies {
            let outcome = extract_financial(self.search.as_ref(), company).await.into();
            outcomes.insert(company.display_name.clone(), outcome);
        }
        outcomes
    }

    /// Recent news over a trailing day window
    ///
    /// Three queries per company; a failed query is logged and skipped, so a
    /// company only fails here if something outside the query loop breaks.
    #[instrument(skip_all, fields(companies = request.companies.len()))]
    pub async fn fetch_news(&self, request: &AnalysisRequest) -> SourceMap<NewsData> {
        let mut outcomes = SourceMap::new();
        if !request.analysis_type.needs_news() {
            return outcomes;
        }

        for company in &request.companies {
            let data = self.news_for_company(company).await;
            outcomes.insert(company.display_name.clone(), data.into());
        }
        outcomes
    }

    async fn news_for_company(&self, company: &CompanyRecord) -> Result<NewsData, String> {
        let name = &company.display_name;
        let first_term = company
            .search_terms
            .first()
            .map_or(name.as_str(), String::as_str);

        let queries = [
            format!("{name} financial results earnings"),
            format!("{name} stock price movement"),
            format!("{first_term} latest news"),
        ];
        let per_query = self.config.news_max_results / NEWS_QUERY_COUNT;

        let mut articles = Vec::new();
        for query in queries {
            let request =
                SearchRequest::news(query.clone(), self.config.news_days, per_query.max(1));
            match self.search.search(request).await {
                Ok(response) => {
                    articles.extend(response.results.into_iter().map(|result| NewsArticle {
                        title: result.title,
                        content: result.content,
                        url: result.url,
                    }));
                }
                Err(e) => {
                    warn!(%query, error = %e, "News query failed, skipping");
                }
            }
        }

        let total_found = articles.len();
        articles.truncate(self.config.news_max_results);

        Ok(NewsData {
            company: name.clone(),
            results: articles,
            total_found,
        })
    }

    /// Transcript location and summarization
    #[instrument(skip_all, fields(companies = request.companies.len()))]
    pub async fn fetch_transcript(&self, request: &AnalysisRequest) -> SourceMap<TranscriptData> {
        let mut outcomes = SourceMap::new();
        if !request.analysis_type.needs_transcript() {
            return outcomes;
        }

        for company in &request.companies {
            let outcome = self.transcripts.fetch(company).await.into();
            outcomes.insert(company.display_name.clone(), outcome);
        }
        outcomes
    }

    /// Investor-relations site crawl, website analysis only
    #[instrument(skip_all, fields(companies = request.companies.len()))]
    pub async fn fetch_website(&self, request: &AnalysisRequest) -> SourceMap<WebsiteData> {
        let mut outcomes = SourceMap::new();
        if request.analysis_type != AnalysisType::Website {
            return outcomes;
        }

        for company in &request.companies {
            let data = self.website_for_company(company).await;
            outcomes.insert(company.display_name.clone(), data.into());
        }
        outcomes
    }

    async fn website_for_company(&self, company: &CompanyRecord) -> Result<WebsiteData, String> {
        let name = &company.display_name;
        let search_request =
            SearchRequest::basic(format!("{name} investor relations official website"), 5);
        let response = self
            .search
            .search(search_request)
            .await
            .map_err(|e| format!("Failed to crawl company websites: {e}"))?;

        let mut pages = Vec::new();
        for result in response.results.into_iter().take(2) {
            if !WEBSITE_URL_KEYWORDS.iter().any(|kw| result.url.contains(kw)) {
                continue;
            }

            let crawl = CrawlRequest {
                url: result.url.clone(),
                max_depth: 2,
                max_breadth: 10,
                limit: 20,
                instructions: format!(
                    "Find financial reports, earnings, and investor information for {name}"
                ),
            };
            match self.search.crawl(crawl).await {
                Ok(crawled) => {
                    pages.extend(crawled.results.into_iter().map(|page| CrawledPage {
                        url: page.url,
                        content: page.raw_content,
                    }));
                }
                Err(e) => {
                    warn!(url = %result.url, error = %e, "Crawl failed, skipping");
                }
            }
        }

        Ok(WebsiteData {
            company: name.clone(),
            pages,
        })
    }

    /// Financial document URL mapping, resources analysis only
    #[instrument(skip_all, fields(companies = request.companies.len()))]
    pub async fn fetch_resources(&self, request: &AnalysisRequest) -> SourceMap<ResourcesData> {
        let mut outcomes = SourceMap::new();
        if request.analysis_type != AnalysisType::Resources {
            return outcomes;
        }

        for company in &request.companies {
            let data = self.resources_for_company(company).await;
            outcomes.insert(company.display_name.clone(), data.into());
        }
        outcomes
    }

    async fn resources_for_company(
        &self,
        company: &CompanyRecord,
    ) -> Result<ResourcesData, String> {
        let name = &company.display_name;
        let search_request =
            SearchRequest::basic(format!("{name} annual report financial statements BSE NSE"), 3);
        let response = self
            .search
            .search(search_request)
            .await
            .map_err(|e| format!("Failed to map financial resources: {e}"))?;

        let mut sites = Vec::new();
        for result in response.results {
            let map = MapRequest {
                url: result.url.clone(),
                max_depth: 2,
                max_breadth: 15,
                limit: 30,
                instructions: format!("Map financial documents and reports for {name}"),
            };
            match self.search.map(map).await {
                Ok(mapped) => {
                    if !mapped.results.is_empty() {
                        sites.push(MappedSite {
                            base_url: mapped.base_url,
                            discovered_urls: mapped.results,
                        });
                    }
                }
                Err(e) => {
                    warn!(url = %result.url, error = %e, "Map failed, skipping");
                }
            }
        }

        Ok(ResourcesData {
            company: name.clone(),
            sites,
        })
    }
}
