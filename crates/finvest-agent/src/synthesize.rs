//! Report synthesis over the fetched state
//!
//! Per-company reports bundle every successful source into one labeled text
//! block and send it with a mode-specific system prompt. Comparative runs
//! produce a full report per company first, then a second pass ranks them.
//! Synthesis never returns an error to the caller: LLM failures become
//! error text in the report slot.

use crate::config::FinvestConfig;
use crate::prompts;
use crate::state::AnalysisState;
use finvest_core::{AnalysisType, CompanyRecord};
use finvest_llm::{CompletionRequest, LLMProvider};
use std::sync::Arc;
use tracing::instrument;

const NEWS_BUNDLE_LIMIT: usize = 5;
const WEBSITE_BUNDLE_LIMIT: usize = 5;
const COMPANY_BANNER: &str = "==================================================";

/// Turns fetched state into the final report text
pub struct Synthesizer {
    llm: Arc<dyn LLMProvider>,
    model: String,
}

impl Synthesizer {
    /// Create a new synthesizer
    pub fn new(llm: Arc<dyn LLMProvider>, config: &FinvestConfig) -> Self {
        Self {
            llm,
            model: config.gemini_model.clone(),
        }
    }

    /// Produce the final output for a completed fetch pass
    ///
    /// A validation error short-circuits straight to its message.
    #[instrument(skip_all, fields(analysis_type = %state.request.analysis_type))]
    pub async fn synthesize(&self, state: &AnalysisState) -> String {
        if let Some(message) = &state.error_message {
            return message.clone();
        }

        let request = &state.request;
        if request.analysis_type == AnalysisType::Comparative && request.companies.len() > 1 {
            return self.comparative_report(state).await;
        }

        let mut reports = Vec::with_capacity(request.companies.len());
        for company in &request.companies {
            reports.push(
                self.company_report(company, state, request.analysis_type)
                    .await,
            );
        }
        reports.join("\n\n")
    }

    /// One company's report in the requested mode
    async fn company_report(
        &self,
        company: &CompanyRecord,
        state: &AnalysisState,
        analysis_type: AnalysisType,
    ) -> String {
        let name = &company.display_name;
        let bundle = build_bundle(name, state);

        if bundle.trim().is_empty() {
            return format!("Insufficient data available for {name} analysis.");
        }

        let system = match analysis_type {
            AnalysisType::Financial => prompts::financial_system_prompt(name),
            AnalysisType::News => prompts::news_system_prompt(name),
            AnalysisType::Transcript => prompts::transcript_system_prompt(name),
            _ => prompts::full_system_prompt(name),
        };

        let request = CompletionRequest::deterministic(
            &self.model,
            system,
            prompts::analyze_user_message(name, &bundle),
        );

        match self.llm.complete(request).await {
            Ok(response) => response.content,
            Err(e) => format!("Error generating analysis for {name}: {e}"),
        }
    }

    /// Full per-company reports followed by a ranking pass
    async fn comparative_report(&self, state: &AnalysisState) -> String {
        let companies = &state.request.companies;
        let names: Vec<String> = companies
            .iter()
            .map(|company| company.display_name.clone())
            .collect();

        let mut content = String::new();
        for company in companies {
            let report = self
                .company_report(company, state, AnalysisType::Full)
                .await;
            content.push_str(&format!(
                "\n\n{COMPANY_BANNER}\nCOMPANY: {}\n{COMPANY_BANNER}\n{report}",
                company.display_name
            ));
        }

        let request = CompletionRequest::deterministic(
            &self.model,
            prompts::comparative_system_prompt(&names),
            prompts::compare_user_message(&content),
        );

        match self.llm.complete(request).await {
            Ok(response) => response.content,
            Err(e) => format!("Error generating comparative analysis: {e}"),
        }
    }
}

/// Assemble the labeled data bundle for one company
///
/// Only successful outcomes contribute; a company whose every source failed
/// produces an empty bundle, which the caller reports as insufficient data.
fn build_bundle(company_name: &str, state: &AnalysisState) -> String {
    let mut sections = Vec::new();

    if let Some(data) = state.financial.get(company_name).and_then(|o| o.payload()) {
        sections.push(format!("FINANCIAL DATA:\n{}", data.content));
    }

    if let Some(data) = state.transcript.get(company_name).and_then(|o| o.payload()) {
        sections.push(format!("EARNINGS CALL ANALYSIS:\n{}", data.summary));
    }

    if let Some(data) = state.news.get(company_name).and_then(|o| o.payload()) {
        if !data.results.is_empty() {
            let news_content = data
                .results
                .iter()
                .take(NEWS_BUNDLE_LIMIT)
                .map(|article| format!("- {}: {}", article.title, article.content))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("RECENT NEWS:\n{news_content}"));
        }
    }

    if let Some(data) = state.website.get(company_name).and_then(|o| o.payload()) {
        if !data.pages.is_empty() {
            let page_content = data
                .pages
                .iter()
                .take(WEBSITE_BUNDLE_LIMIT)
                .map(|page| format!("- {}: {}", page.url, page.content))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("WEBSITE CONTENT:\n{page_content}"));
        }
    }

    if let Some(data) = state.resources.get(company_name).and_then(|o| o.payload()) {
        if !data.sites.is_empty() {
            let resource_content = data
                .sites
                .iter()
                .map(|site| format!("- {}: {}", site.base_url, site.discovered_urls.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(format!("FINANCIAL RESOURCES:\n{resource_content}"));
        }
    }

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{FinancialData, NewsArticle, NewsData, SourceMap, TranscriptData};
    use crate::testkit::{request_for, ScriptedLlm};
    use finvest_core::FetchOutcome;

    const PFC: &str = "Power Finance Corporation";
    const REC: &str = "Rural Electrification Corporation";

    fn financial_map(company: &str) -> SourceMap<FinancialData> {
        let mut map = SourceMap::new();
        map.insert(
            company.to_string(),
            FetchOutcome::success(FinancialData {
                company: company.to_string(),
                url: "https://example.com".to_string(),
                content: "Revenue grew 12%".to_string(),
            }),
        );
        map
    }

    fn synthesizer(llm: Arc<ScriptedLlm>) -> Synthesizer {
        Synthesizer::new(llm, &FinvestConfig::default())
    }

    #[tokio::test]
    async fn test_validation_error_short_circuits() {
        let llm = Arc::new(ScriptedLlm::default());
        let state = AnalysisState::new(request_for("nothing", AnalysisType::Full))
            .with_error("No supported companies detected in your query.");

        let output = synthesizer(llm.clone()).synthesize(&state).await;
        assert!(output.starts_with("No supported companies"));
        assert!(llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_bundle_reports_insufficient_data() {
        let llm = Arc::new(ScriptedLlm::default());
        let state = AnalysisState::new(request_for("PFC financials", AnalysisType::Financial));

        let output = synthesizer(llm.clone()).synthesize(&state).await;
        assert_eq!(
            output,
            "Insufficient data available for Power Finance Corporation analysis."
        );
        assert!(llm.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_financial_report_uses_financial_prompt() {
        let llm = Arc::new(ScriptedLlm::default());
        llm.push("PFC looks healthy.");
        let state = AnalysisState::new(request_for("PFC financials", AnalysisType::Financial))
            .with_financial(financial_map(PFC));

        let output = synthesizer(llm.clone()).synthesize(&state).await;
        assert_eq!(output, "PFC looks healthy.");

        let requests = llm.requests.lock().unwrap();
        let system = requests[0].system.as_deref().unwrap_or_default();
        assert!(system.contains("expert financial analyst"));
        assert!(requests[0].messages[0].content.contains("Revenue grew 12%"));
    }

    #[tokio::test]
    async fn test_bundle_orders_sections() {
        let mut transcript = SourceMap::new();
        transcript.insert(
            PFC.to_string(),
            FetchOutcome::success(TranscriptData {
                company: PFC.to_string(),
                transcript_url: "https://example.com/t.pdf".to_string(),
                summary: "Guidance raised".to_string(),
            }),
        );
        let mut news = SourceMap::new();
        news.insert(
            PFC.to_string(),
            FetchOutcome::success(NewsData {
                company: PFC.to_string(),
                results: (0..7)
                    .map(|i| NewsArticle {
                        title: format!("headline {i}"),
                        content: "body".to_string(),
                        url: "https://n.example".to_string(),
                    })
                    .collect(),
                total_found: 7,
            }),
        );

        let state = AnalysisState::new(request_for("PFC full view", AnalysisType::Full))
            .with_financial(financial_map(PFC))
            .with_transcript(transcript)
            .with_news(news);

        let bundle = build_bundle(PFC, &state);
        let financial_at = bundle.find("FINANCIAL DATA:").unwrap();
        let transcript_at = bundle.find("EARNINGS CALL ANALYSIS:").unwrap();
        let news_at = bundle.find("RECENT NEWS:").unwrap();
        assert!(financial_at < transcript_at);
        assert!(transcript_at < news_at);
        // Top five articles only.
        assert!(bundle.contains("headline 4"));
        assert!(!bundle.contains("headline 5"));
    }

    #[tokio::test]
    async fn test_failed_sources_excluded_from_bundle() {
        let mut financial = SourceMap::new();
        financial.insert(
            PFC.to_string(),
            FetchOutcome::<FinancialData>::failure("No financial data extracted"),
        );
        let state = AnalysisState::new(request_for("PFC full view", AnalysisType::Full))
            .with_financial(financial);

        assert!(build_bundle(PFC, &state).is_empty());
    }

    #[tokio::test]
    async fn test_comparative_runs_per_company_then_ranking() {
        let llm = Arc::new(ScriptedLlm::default());
        llm.push("PFC report");
        llm.push("REC report");
        llm.push("Ranking: PFC first");

        let mut financial = financial_map(PFC);
        financial.extend(financial_map(REC));
        let state = AnalysisState::new(request_for(
            "Compare PFC and RECLTD",
            AnalysisType::Comparative,
        ))
        .with_financial(financial);
        assert_eq!(state.request.companies.len(), 2);

        let output = synthesizer(llm.clone()).synthesize(&state).await;
        assert_eq!(output, "Ranking: PFC first");

        let requests = llm.requests.lock().unwrap();
        assert_eq!(requests.len(), 3);
        // Per-company passes use the full template regardless of mode.
        assert!(requests[0]
            .system
            .as_deref()
            .unwrap_or_default()
            .contains("senior equity research analyst covering"));
        let ranking_input = &requests[2].messages[0].content;
        assert!(ranking_input.contains(COMPANY_BANNER));
        assert!(ranking_input.contains("COMPANY: Power Finance Corporation"));
        assert!(ranking_input.contains("PFC report"));
    }

    #[tokio::test]
    async fn test_llm_failure_becomes_report_text() {
        let llm = Arc::new(ScriptedLlm::default());
        llm.push_error("boom");
        let state = AnalysisState::new(request_for("PFC financials", AnalysisType::Financial))
            .with_financial(financial_map(PFC));

        let output = synthesizer(llm).synthesize(&state).await;
        assert!(output.starts_with("Error generating analysis for Power Finance Corporation:"));
    }

    #[tokio::test]
    async fn test_multi_company_reports_joined() {
        let llm = Arc::new(ScriptedLlm::default());
        llm.push("PFC report");
        llm.push("REC report");

        let mut financial = financial_map(PFC);
        financial.extend(financial_map(REC));
        let state = AnalysisState::new(request_for(
            "PFC and RECLTD financials",
            AnalysisType::Financial,
        ))
        .with_financial(financial);

        let output = synthesizer(llm).synthesize(&state).await;
        assert!(output.contains("PFC report"));
        assert!(output.contains("REC report"));
        assert!(output.contains("\n\n"));
    }
}
