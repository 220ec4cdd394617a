//! Transcript document download and text extraction
//!
//! Earnings call transcripts are published as PDF documents linked from the
//! extracted financial page. This module downloads the binary and pulls the
//! plain text out of it.

use crate::error::{Result, SearchError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::instrument;

// Some transcript hosts reject requests without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Fetches a document URL and returns its plain text
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// Download the document at `url` and extract its text content
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// PDF-backed document reader
pub struct PdfDocumentReader {
    client: Client,
}

impl PdfDocumentReader {
    /// Create a new PDF document reader
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(|e| SearchError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentReader for PdfDocumentReader {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::DocumentError(format!("Download failed: {e}")))?;

        if !response.status().is_success() {
            return Err(SearchError::DocumentError(format!(
                "Download failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SearchError::DocumentError(format!("Download failed: {e}")))?;

        // PDF parsing is CPU-bound; keep it off the async executor.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| SearchError::DocumentError(format!("Extraction task failed: {e}")))?
            .map_err(|e| SearchError::DocumentError(format!("PDF text extraction failed: {e}")))?;

        Ok(text.trim().to_string())
    }
}
