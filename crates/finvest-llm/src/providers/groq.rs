//! Groq provider implementation
//!
//! This module implements the LLMProvider trait against Groq's
//! OpenAI-compatible chat completions endpoint.
//! See: https://console.groq.com/docs/api-reference

use crate::{
    CompletionRequest, CompletionResponse, LLMProvider, Result, Role, StopReason, TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq provider
///
/// Used by the transcript summarizer. Retries transient failures a small
/// bounded number of times, like the Gemini provider.
pub struct GroqProvider {
    client: Client,
    api_key: String,
    max_retries: u32,
}

impl GroqProvider {
    /// Create a new Groq provider
    pub fn new(api_key: String, max_retries: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self {
            client,
            api_key,
            max_retries,
        })
    }

    /// Create a provider from the `GROQ_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            crate::LLMError::ConfigurationError(
                "GROQ_API_KEY environment variable not set".to_string(),
            )
        })?;
        Self::new(api_key, 2)
    }

    fn build_request(request: &CompletionRequest) -> GroqRequest {
        // The chat completions format carries the system prompt as the
        // first message rather than a separate field.
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(GroqMessage {
                role: "system".to_string(),
                content: system.clone(),
            });
        }
        for m in &request.messages {
            messages.push(GroqMessage {
                role: match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                    Role::System => "system",
                }
                .to_string(),
                content: m.content.clone(),
            });
        }

        GroqRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

#[async_trait]
impl LLMProvider for GroqProvider {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let model = request.model.clone();
        let groq_request = Self::build_request(&request);
        let url = format!("{GROQ_API_BASE}/chat/completions");

        let mut attempt = 0;
        let response = loop {
            debug!(attempt, "Sending request to Groq API");

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&groq_request)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                break response;
            }

            let retryable = status.as_u16() == 429 || status.is_server_error();
            if retryable && attempt < self.max_retries {
                attempt += 1;
                warn!(%status, attempt, "Groq request failed, retrying");
                tokio::time::sleep(std::time::Duration::from_secs(u64::from(attempt))).await;
                continue;
            }

            let error_text = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 => crate::LLMError::AuthenticationFailed,
                429 => crate::LLMError::RateLimitExceeded(error_text),
                400 => crate::LLMError::InvalidRequest(error_text),
                404 => crate::LLMError::ModelNotFound(model),
                _ => crate::LLMError::RequestFailed(format!("HTTP {status}: {error_text}")),
            });
        };

        let groq_response: GroqResponse = response.json().await.map_err(|e| {
            crate::LLMError::UnexpectedResponse(format!("Failed to parse response: {e}"))
        })?;

        let choice = groq_response.choices.into_iter().next().ok_or_else(|| {
            crate::LLMError::UnexpectedResponse("Response contained no choices".to_string())
        })?;

        let usage = groq_response.usage.unwrap_or_default();
        debug!(
            "Received response - finish_reason: {:?}, tokens: {}/{}",
            choice.finish_reason, usage.prompt_tokens, usage.completion_tokens
        );

        Ok(CompletionResponse {
            content: choice.message.content,
            stop_reason: match choice.finish_reason.as_deref() {
                Some("stop") | None => StopReason::EndTurn,
                Some("length") => StopReason::MaxTokens,
                Some(other) => {
                    debug!("Unexpected finish reason: {other}");
                    StopReason::Other
                }
            },
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }

    fn name(&self) -> &'static str {
        "groq"
    }
}

// Groq-specific request/response types (OpenAI-compatible wire format)

#[derive(Debug, Serialize)]
struct GroqRequest {
    model: String,
    messages: Vec<GroqMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GroqMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GroqUsage {
    #[serde(default)]
    prompt_tokens: usize,
    #[serde(default)]
    completion_tokens: usize,
}
