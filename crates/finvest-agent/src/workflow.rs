//! The analysis workflow: a fixed, acyclic state machine
//!
//! Stages run in a deterministic order decided once after validation. The
//! financial, news, and transcript stages always run as a chain for the
//! types that need any of them; each fetcher is internally gated, so a
//! stage that does not apply contributes an empty map and costs one step.
//! The step counter bounds the run even if the transition table is edited
//! into a cycle later.

use crate::config::FinvestConfig;
use crate::error::{AgentError, Result};
use crate::fetch::DataFetchers;
use crate::intent::IntentExtractor;
use crate::state::AnalysisState;
use crate::synthesize::Synthesizer;
use crate::transcript::TranscriptAnalyzer;
use finvest_core::{AnalysisType, CompanyRegistry};
use finvest_llm::providers::{GeminiProvider, GroqProvider};
use finvest_search::{PdfDocumentReader, TavilyClient};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Workflow stages, in the only orders they can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Extract,
    Validate,
    FetchFinancial,
    FetchNews,
    FetchTranscript,
    FetchWebsite,
    FetchResources,
    Synthesize,
}

/// Drives a query through extraction, validation, fetching, and synthesis
pub struct WorkflowController {
    registry: Arc<CompanyRegistry>,
    extractor: IntentExtractor,
    fetchers: DataFetchers,
    synthesizer: Synthesizer,
    step_budget: usize,
}

impl WorkflowController {
    /// Assemble a controller from already-built collaborators
    pub fn new(
        registry: Arc<CompanyRegistry>,
        fetchers: DataFetchers,
        synthesizer: Synthesizer,
        config: &FinvestConfig,
    ) -> Self {
        Self {
            extractor: IntentExtractor::new(registry.clone()),
            registry,
            fetchers,
            synthesizer,
            step_budget: config.step_budget,
        }
    }

    /// Build the production controller: Tavily retrieval, PDF transcripts,
    /// Gemini synthesis, Groq summarization
    pub fn from_config(config: FinvestConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(CompanyRegistry::standard());
        let search = Arc::new(TavilyClient::new(
            config.tavily_api_key.clone(),
            config.search_rate_limit,
        ));
        let reader = Arc::new(PdfDocumentReader::new()?);
        let groq = Arc::new(GroqProvider::new(
            config.groq_api_key.clone(),
            config.max_retries,
        )?);
        let gemini = Arc::new(GeminiProvider::new(
            config.google_api_key.clone(),
            config.max_retries,
        )?);

        let transcripts = TranscriptAnalyzer::new(search.clone(), reader, groq, &config);
        let fetchers = DataFetchers::new(search, transcripts, config.clone());
        let synthesizer = Synthesizer::new(gemini, &config);

        Ok(Self::new(registry, fetchers, synthesizer, &config))
    }

    /// Run a query to its final report
    ///
    /// Errors surface only for budget exhaustion; everything else is
    /// captured in the report text.
    #[instrument(skip(self))]
    pub async fn run(&self, query: &str) -> Result<String> {
        let mut stage = Stage::Extract;
        let mut state = AnalysisState::default();
        let mut steps = 0usize;

        loop {
            steps += 1;
            if steps > self.step_budget {
                return Err(AgentError::StepBudgetExceeded {
                    budget: self.step_budget,
                });
            }
            debug!(?stage, steps, "Entering workflow stage");

            stage = match stage {
                Stage::Extract => {
                    state = AnalysisState::new(self.extractor.extract(query));
                    Stage::Validate
                }
                Stage::Validate => {
                    if state.request.has_companies() {
                        Self::entry_stage(state.request.analysis_type)
                    } else {
                        state = state.with_error(self.validation_message());
                        Stage::Synthesize
                    }
                }
                Stage::FetchFinancial => {
                    let financial = self.fetchers.fetch_financial(&state.request).await;
                    state = state.with_financial(financial);
                    Stage::FetchNews
                }
                Stage::FetchNews => {
                    let news = self.fetchers.fetch_news(&state.request).await;
                    state = state.with_news(news);
                    Stage::FetchTranscript
                }
                Stage::FetchTranscript => {
                    let transcript = self.fetchers.fetch_transcript(&state.request).await;
                    state = state.with_transcript(transcript);
                    Stage::Synthesize
                }
                Stage::FetchWebsite => {
                    let website = self.fetchers.fetch_website(&state.request).await;
                    state = state.with_website(website);
                    Stage::Synthesize
                }
                Stage::FetchResources => {
                    let resources = self.fetchers.fetch_resources(&state.request).await;
                    state = state.with_resources(resources);
                    Stage::Synthesize
                }
                Stage::Synthesize => {
                    return Ok(self.synthesizer.synthesize(&state).await);
                }
            };
        }
    }

    /// Like `run`, but folds every failure into the report text
    pub async fn analyze(&self, query: &str) -> String {
        match self.run(query).await {
            Ok(report) => report,
            Err(e) => format!("Error processing your query: {e}"),
        }
    }

    /// First fetch stage after validation
    ///
    /// News and transcript requests still enter the financial chain at
    /// their own stage; the later chained stages gate themselves off.
    fn entry_stage(analysis_type: AnalysisType) -> Stage {
        match analysis_type {
            AnalysisType::News => Stage::FetchNews,
            AnalysisType::Transcript => Stage::FetchTranscript,
            AnalysisType::Website => Stage::FetchWebsite,
            AnalysisType::Resources => Stage::FetchResources,
            AnalysisType::Financial | AnalysisType::Full | AnalysisType::Comparative => {
                Stage::FetchFinancial
            }
        }
    }

    fn validation_message(&self) -> String {
        format!(
            "No supported companies detected in your query. Supported companies: {}. \
Please mention one or more of these companies in your query.",
            self.registry.display_names()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{NullReader, ScriptedLlm, StubSearch};
    use finvest_search::{ExtractResponse, ExtractedPage, SearchResponse, SearchResult};

    struct Harness {
        search: Arc<StubSearch>,
        llm: Arc<ScriptedLlm>,
        controller: WorkflowController,
    }

    fn harness() -> Harness {
        harness_with_budget(FinvestConfig::default().step_budget)
    }

    fn harness_with_budget(step_budget: usize) -> Harness {
        let config = FinvestConfig {
            step_budget,
            ..FinvestConfig::default()
        };
        let search = Arc::new(StubSearch::default());
        let llm = Arc::new(ScriptedLlm::default());

        let transcripts = TranscriptAnalyzer::new(
            search.clone(),
            Arc::new(NullReader),
            llm.clone(),
            &config,
        );
        let fetchers = DataFetchers::new(search.clone(), transcripts, config.clone());
        let synthesizer = Synthesizer::new(llm.clone(), &config);
        let controller = WorkflowController::new(
            Arc::new(CompanyRegistry::standard()),
            fetchers,
            synthesizer,
            &config,
        );

        Harness {
            search,
            llm,
            controller,
        }
    }

    fn screener_page(content: &str) -> ExtractResponse {
        ExtractResponse {
            results: vec![ExtractedPage {
                url: "https://www.screener.in/company/PFC/consolidated/".to_string(),
                raw_content: content.to_string(),
            }],
        }
    }

    #[tokio::test]
    async fn test_unknown_company_returns_validation_message() {
        let h = harness();
        let output = h.controller.analyze("analyze Tesla for me").await;

        assert!(output.starts_with("No supported companies detected in your query."));
        assert!(output.contains("Power Finance Corporation"));
        assert!(output.contains("HDFC Bank Limited"));
        assert!(output.ends_with("Please mention one or more of these companies in your query."));
        assert!(h.llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_financial_query_end_to_end() {
        let h = harness();
        h.search.push_extract(screener_page("Revenue table"));
        h.llm.push("PFC is sound.");

        let output = h.controller.analyze("PFC financial health").await;
        assert_eq!(output, "PFC is sound.");
    }

    #[tokio::test]
    async fn test_news_query_skips_financial_and_transcript() {
        let h = harness();
        for _ in 0..3 {
            h.search.push_search(SearchResponse {
                results: vec![SearchResult {
                    title: "headline".to_string(),
                    url: "https://n.example".to_string(),
                    content: "body".to_string(),
                    score: 1.0,
                    raw_content: None,
                }],
                answer: None,
            });
        }
        h.llm.push("News summary.");

        let output = h.controller.analyze("latest news about PFC").await;
        assert_eq!(output, "News summary.");
        // No extract calls were scripted; reaching the financial fetcher
        // would have produced a failure outcome and a different prompt.
        let requests = h.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .system
            .as_deref()
            .unwrap_or_default()
            .contains("financial news analyst"));
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_insufficient_data() {
        let h = harness();
        h.search.push_extract_error("server error");

        let output = h.controller.analyze("PFC financial ratios").await;
        assert_eq!(
            output,
            "Insufficient data available for Power Finance Corporation analysis."
        );
    }

    #[tokio::test]
    async fn test_step_budget_exhaustion() {
        let h = harness_with_budget(2);
        let result = h.controller.run("PFC financial health").await;
        assert!(matches!(
            result,
            Err(AgentError::StepBudgetExceeded { budget: 2 })
        ));

        let output = h.controller.analyze("PFC financial health").await;
        assert!(output.starts_with("Error processing your query:"));
    }

    #[tokio::test]
    async fn test_full_query_runs_financial_chain() {
        let h = harness();
        // Financial extract succeeds.
        h.search
            .push_extract(screener_page("Revenue table [Transcript](https://t.example/q4.pdf)"));
        // News queries all fail; they are skipped, not fatal.
        for _ in 0..3 {
            h.search.push_search_error("quota");
        }
        // Transcript stage re-extracts the screener page.
        h.search
            .push_extract(screener_page("Revenue table [Transcript](https://t.example/q4.pdf)"));
        // NullReader fails the PDF download; transcript becomes a failure
        // outcome while financial data still feeds the report.
        h.llm.push("Full report.");

        let output = h.controller.analyze("comprehensive view of PFC").await;
        assert_eq!(output, "Full report.");

        let requests = h.llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let bundle = &requests[0].messages[0].content;
        assert!(bundle.contains("FINANCIAL DATA:"));
        assert!(!bundle.contains("EARNINGS CALL ANALYSIS:"));
    }

    #[tokio::test]
    async fn test_comparative_query_produces_ranking() {
        let h = harness();
        // Extract for PFC and REC, in registry order.
        h.search.push_extract(screener_page("PFC table"));
        h.search.push_extract(screener_page("REC table"));
        // News queries: three per company, all failing.
        for _ in 0..6 {
            h.search.push_search_error("quota");
        }
        // Transcript extracts fail, producing failure outcomes.
        h.search.push_extract_error("down");
        h.search.push_extract_error("down");
        // Two per-company reports plus the ranking pass.
        h.llm.push("PFC report");
        h.llm.push("REC report");
        h.llm.push("PFC ranks first.");

        let output = h.controller.analyze("PFC vs RECLTD, which is stronger?").await;
        assert_eq!(output, "PFC ranks first.");
    }
}
