//! Configuration for the research workflow

use crate::error::{AgentError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for the research workflow
///
/// Constructed once at process start and passed explicitly into the
/// workflow controller; there are no ambient globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinvestConfig {
    /// Tavily API key
    pub tavily_api_key: String,

    /// Google API key for the Gemini synthesis provider
    pub google_api_key: String,

    /// Groq API key for the transcript summarization provider
    pub groq_api_key: String,

    /// Model used for report synthesis
    pub gemini_model: String,

    /// Model used for transcript summarization
    pub groq_model: String,

    /// Sampling temperature for all generative calls
    pub temperature: f32,

    /// Bounded retry count inside the LLM providers (opaque to the workflow)
    pub max_retries: u32,

    /// Search API rate limit, requests per minute
    pub search_rate_limit: u32,

    /// Trailing day window for news searches
    pub news_days: u32,

    /// Maximum news results kept per company
    pub news_max_results: usize,

    /// Maximum workflow stage transitions per run
    pub step_budget: usize,
}

impl Default for FinvestConfig {
    fn default() -> Self {
        Self {
            tavily_api_key: String::new(),
            google_api_key: String::new(),
            groq_api_key: String::new(),
            gemini_model: "gemini-2.0-flash".to_string(),
            groq_model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.0,
            max_retries: 2,
            search_rate_limit: 60,
            news_days: 30,
            news_max_results: 10,
            // The fixed pipeline is at most 6 stages deep
            step_budget: 12,
        }
    }
}

impl FinvestConfig {
    /// Create a new configuration builder
    pub fn builder() -> FinvestConfigBuilder {
        FinvestConfigBuilder::default()
    }

    /// Load API keys from the environment
    ///
    /// Reads `TAVILY_API_KEY`, `GOOGLE_API_KEY`, and `GROQ_API_KEY`.
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.tavily_api_key = key;
        }
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.google_api_key = key;
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.groq_api_key = key;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tavily_api_key.is_empty() {
            return Err(AgentError::ConfigError(
                "Tavily API key is required".to_string(),
            ));
        }
        if self.google_api_key.is_empty() {
            return Err(AgentError::ConfigError(
                "Google API key is required".to_string(),
            ));
        }
        if self.groq_api_key.is_empty() {
            return Err(AgentError::ConfigError(
                "Groq API key is required".to_string(),
            ));
        }
        if self.news_max_results == 0 {
            return Err(AgentError::ConfigError(
                "news_max_results must be greater than 0".to_string(),
            ));
        }
        if self.step_budget == 0 {
            return Err(AgentError::ConfigError(
                "step_budget must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for FinvestConfig
#[derive(Debug, Default)]
pub struct FinvestConfigBuilder {
    tavily_api_key: Option<String>,
    google_api_key: Option<String>,
    groq_api_key: Option<String>,
    gemini_model: Option<String>,
    groq_model: Option<String>,
    max_retries: Option<u32>,
    search_rate_limit: Option<u32>,
    news_days: Option<u32>,
    news_max_results: Option<usize>,
    step_budget: Option<usize>,
}

impl FinvestConfigBuilder {
    /// Set the Tavily API key
    pub fn tavily_api_key(mut self, key: impl Into<String>) -> Self {
        self.tavily_api_key = Some(key.into());
        self
    }

    /// Set the Google API key
    pub fn google_api_key(mut self, key: impl Into<String>) -> Self {
        self.google_api_key = Some(key.into());
        self
    }

    /// Set the Groq API key
    pub fn groq_api_key(mut self, key: impl Into<String>) -> Self {
        self.groq_api_key = Some(key.into());
        self
    }

    /// Set the synthesis model
    pub fn gemini_model(mut self, model: impl Into<String>) -> Self {
        self.gemini_model = Some(model.into());
        self
    }

    /// Set the transcript summarization model
    pub fn groq_model(mut self, model: impl Into<String>) -> Self {
        self.groq_model = Some(model.into());
        self
    }

    /// Set the bounded provider retry count
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set the search API rate limit
    pub fn search_rate_limit(mut self, per_minute: u32) -> Self {
        self.search_rate_limit = Some(per_minute);
        self
    }

    /// Set the news search day window
    pub fn news_days(mut self, days: u32) -> Self {
        self.news_days = Some(days);
        self
    }

    /// Set the per-company news result cap
    pub fn news_max_results(mut self, max: usize) -> Self {
        self.news_max_results = Some(max);
        self
    }

    /// Set the workflow step ceiling
    pub fn step_budget(mut self, budget: usize) -> Self {
        self.step_budget = Some(budget);
        self
    }

    /// Load API keys from the environment
    pub fn with_env_keys(mut self) -> Self {
        if let Ok(key) = std::env::var("TAVILY_API_KEY") {
            self.tavily_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
            self.google_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GROQ_API_KEY") {
            self.groq_api_key = Some(key);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FinvestConfig> {
        let defaults = FinvestConfig::default();

        let config = FinvestConfig {
            tavily_api_key: self.tavily_api_key.unwrap_or(defaults.tavily_api_key),
            google_api_key: self.google_api_key.unwrap_or(defaults.google_api_key),
            groq_api_key: self.groq_api_key.unwrap_or(defaults.groq_api_key),
            gemini_model: self.gemini_model.unwrap_or(defaults.gemini_model),
            groq_model: self.groq_model.unwrap_or(defaults.groq_model),
            temperature: defaults.temperature,
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            search_rate_limit: self.search_rate_limit.unwrap_or(defaults.search_rate_limit),
            news_days: self.news_days.unwrap_or(defaults.news_days),
            news_max_results: self.news_max_results.unwrap_or(defaults.news_max_results),
            step_budget: self.step_budget.unwrap_or(defaults.step_budget),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FinvestConfig::default();
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_builder_requires_keys() {
        let result = FinvestConfig::builder().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_keys() {
        let config = FinvestConfig::builder()
            .tavily_api_key("tvly-test")
            .google_api_key("g-test")
            .groq_api_key("gsk-test")
            .news_days(7)
            .build()
            .unwrap();

        assert_eq!(config.news_days, 7);
        assert_eq!(config.step_budget, 12);
    }

    #[test]
    fn test_validation_rejects_zero_step_budget() {
        let config = FinvestConfig {
            tavily_api_key: "t".to_string(),
            google_api_key: "g".to_string(),
            groq_api_key: "q".to_string(),
            step_budget: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
