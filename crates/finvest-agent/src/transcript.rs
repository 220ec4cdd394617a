//! Earnings call transcript retrieval and summarization
//!
//! The transcript URL is discovered inside the extracted financial page as a
//! markdown `[Transcript](url)` link. The linked PDF is downloaded, its text
//! split in two near the midpoint, and each half summarized by a fast LLM
//! before a third call merges the halves. Transcripts exceed single-request
//! context limits, hence the split.

use crate::config::FinvestConfig;
use crate::fetch::extract_financial;
use crate::prompts;
use crate::state::TranscriptData;
use finvest_core::CompanyRecord;
use finvest_llm::{CompletionRequest, LLMProvider};
use finvest_search::{DocumentReader, SearchApi};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::instrument;

static TRANSCRIPT_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Transcript\]\((.*?)\)").expect("valid transcript pattern"));

const MIN_TRANSCRIPT_LEN: usize = 1000;
const SPLIT_SCAN_WINDOW: usize = 1000;

/// Fetches and summarizes the latest earnings call transcript for a company
pub struct TranscriptAnalyzer {
    search: Arc<dyn SearchApi>,
    reader: Arc<dyn DocumentReader>,
    llm: Arc<dyn LLMProvider>,
    model: String,
}

impl TranscriptAnalyzer {
    /// Create a new transcript analyzer
    pub fn new(
        search: Arc<dyn SearchApi>,
        reader: Arc<dyn DocumentReader>,
        llm: Arc<dyn LLMProvider>,
        config: &FinvestConfig,
    ) -> Self {
        Self {
            search,
            reader,
            llm,
            model: config.groq_model.clone(),
        }
    }

    /// Locate, download, and summarize the transcript
    ///
    /// Errors are returned as plain strings so the caller can capture them
    /// per company without aborting the batch.
    #[instrument(skip(self), fields(company = %company.display_name))]
    pub async fn fetch(&self, company: &CompanyRecord) -> Result<TranscriptData, String> {
        let financial = extract_financial(self.search.as_ref(), company)
            .await
            .map_err(|_| "Could not extract base financial data".to_string())?;

        let transcript_url = find_transcript_url(&financial.content)
            .ok_or_else(|| "No transcript URLs found".to_string())?;

        let text = self
            .reader
            .fetch_text(&transcript_url)
            .await
            .map_err(|e| format!("Failed to get transcript data: {e}"))?;

        let summary = self.summarize(&text, &company.display_name).await;

        Ok(TranscriptData {
            company: company.display_name.clone(),
            transcript_url,
            summary,
        })
    }

    /// Two-pass summary: each half independently, then a merge call
    ///
    /// LLM failures degrade to an error string in the summary slot rather
    /// than failing the whole fetch; a located transcript URL is still worth
    /// reporting.
    async fn summarize(&self, text: &str, company_name: &str) -> String {
        if text.len() < MIN_TRANSCRIPT_LEN {
            return "Transcript too short for meaningful analysis".to_string();
        }

        let break_point = split_point(text);
        let (part1, part2) = text.split_at(break_point);

        let result = self.summarize_parts(part1, part2, company_name).await;
        match result {
            Ok(summary) => summary,
            Err(e) => format!("Error analyzing transcript: {e}"),
        }
    }

    async fn summarize_parts(
        &self,
        part1: &str,
        part2: &str,
        company_name: &str,
    ) -> finvest_llm::Result<String> {
        let part1_summary = self
            .llm
            .complete(CompletionRequest::deterministic(
                &self.model,
                prompts::transcript_part1_system_prompt(company_name),
                prompts::transcript_part_user_message(1, part1),
            ))
            .await?
            .content;

        let part2_summary = self
            .llm
            .complete(CompletionRequest::deterministic(
                &self.model,
                prompts::transcript_part2_system_prompt(company_name),
                prompts::transcript_part_user_message(2, part2),
            ))
            .await?
            .content;

        let combined = self
            .llm
            .complete(CompletionRequest::deterministic(
                &self.model,
                prompts::transcript_combine_system_prompt(company_name),
                prompts::transcript_combine_user_message(&part1_summary, &part2_summary),
            ))
            .await?
            .content;

        Ok(combined)
    }
}

/// First transcript link in the page, trimmed to its first whitespace token
fn find_transcript_url(content: &str) -> Option<String> {
    TRANSCRIPT_LINK
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().trim().split_whitespace().next())
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
}

/// Byte index to split the transcript at
///
/// Starts at the midpoint and scans forward up to `SPLIT_SCAN_WINDOW` bytes
/// for sentence-ending punctuation, splitting just after it. Punctuation is
/// ASCII, so the position after it is always a char boundary; when no
/// punctuation is found the midpoint is walked back to the nearest boundary.
pub(crate) fn split_point(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mid = bytes.len() / 2;
    let end = (mid + SPLIT_SCAN_WINDOW).min(bytes.len());

    for (offset, byte) in bytes[mid..end].iter().enumerate() {
        if matches!(byte, b'.' | b'!' | b'\n') {
            return mid + offset + 1;
        }
    }

    let mut boundary = mid;
    while boundary > 0 && !text.is_char_boundary(boundary) {
        boundary -= 1;
    }
    boundary
}
