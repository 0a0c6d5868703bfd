//! Extraction configuration.
//!
//! [`ExtractorConfig`] holds credentials, endpoints and limits for the whole
//! pipeline. Build it with [`ExtractorConfig::builder`] or read the standard
//! environment variables with [`ExtractorConfig::from_env`].
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use toolscout_core::ExtractorConfig;
//!
//! let config = ExtractorConfig::builder()
//!     .openai_api_key("sk-test")
//!     .model("gpt-4o-mini")
//!     .fetch_timeout(Duration::from_secs(10))
//!     .build();
//! assert_eq!(config.model, "gpt-4o-mini");
//! ```

use std::time::Duration;

use crate::normalize::DEFAULT_MAX_CHARS;

/// Environment variable holding the text-generation API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the rendering proxy API key.
pub const SCRAPINGBEE_API_KEY_VAR: &str = "SCRAPINGBEE_API_KEY";
/// Environment variable overriding the completion model.
pub const MODEL_VAR: &str = "TOOLSCOUT_MODEL";
/// Environment variable overriding the completion API base URL.
pub const LLM_BASE_URL_VAR: &str = "TOOLSCOUT_LLM_BASE_URL";

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_RENDER_ENDPOINT: &str = "https://app.scrapingbee.com/api/v1/";
pub const DEFAULT_READABILITY_ENDPOINT: &str = "https://readability-api.eu.org/api";

/// Browser-like User-Agent sent by the direct fetcher.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// API key for the text-generation provider.
    pub openai_api_key: Option<String>,
    /// API key for the JS-rendering proxy.
    pub scrapingbee_api_key: Option<String>,
    /// Chat-completion model name.
    pub model: String,
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    pub llm_base_url: String,
    /// Rendering proxy endpoint.
    pub render_endpoint: String,
    /// Readability proxy endpoint.
    pub readability_endpoint: String,
    /// Timeout for every page fetch and logo probe.
    pub fetch_timeout: Duration,
    /// Timeout for the completion call.
    pub model_timeout: Duration,
    /// Settle delay the rendering proxy waits after load, in milliseconds.
    pub render_wait_ms: u64,
    /// User-Agent for direct fetches and logo probes.
    pub user_agent: String,
    /// Character budget for the body excerpt.
    pub max_chars: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            scrapingbee_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            render_endpoint: DEFAULT_RENDER_ENDPOINT.to_string(),
            readability_endpoint: DEFAULT_READABILITY_ENDPOINT.to_string(),
            fetch_timeout: Duration::from_secs(30),
            model_timeout: Duration::from_secs(60),
            render_wait_ms: 3000,
            user_agent: BROWSER_USER_AGENT.to_string(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }
}

impl ExtractorConfig {
    /// Creates a new builder for ExtractorConfig.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::new()
    }

    /// Reads configuration from the process environment.
    ///
    /// Blank variables count as unset. Everything not covered by a variable
    /// keeps its default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            openai_api_key: get(OPENAI_API_KEY_VAR),
            scrapingbee_api_key: get(SCRAPINGBEE_API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or(defaults.model),
            llm_base_url: get(LLM_BASE_URL_VAR).unwrap_or(defaults.llm_base_url),
            ..defaults
        }
    }
}

/// Builder for ExtractorConfig.
pub struct ExtractorConfigBuilder {
    config: ExtractorConfig,
}

impl ExtractorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ExtractorConfig::default() }
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn openai_api_key(mut self, value: impl Into<String>) -> Self {
        self.config.openai_api_key = Some(value.into());
        self
    }

    pub fn scrapingbee_api_key(mut self, value: impl Into<String>) -> Self {
        self.config.scrapingbee_api_key = Some(value.into());
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.config.model = value.into();
        self
    }

    pub fn llm_base_url(mut self, value: impl Into<String>) -> Self {
        self.config.llm_base_url = value.into();
        self
    }

    pub fn render_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.render_endpoint = value.into();
        self
    }

    pub fn readability_endpoint(mut self, value: impl Into<String>) -> Self {
        self.config.readability_endpoint = value.into();
        self
    }

    /// Sets the timeout for page fetches.
    pub fn fetch_timeout(mut self, value: Duration) -> Self {
        self.config.fetch_timeout = value;
        self
    }

    /// Sets the timeout for the completion call.
    pub fn model_timeout(mut self, value: Duration) -> Self {
        self.config.model_timeout = value;
        self
    }

    pub fn render_wait_ms(mut self, value: u64) -> Self {
        self.config.render_wait_ms = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    pub fn max_chars(mut self, value: usize) -> Self {
        self.config.max_chars = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ExtractorConfig {
        self.config
    }
}

impl Default for ExtractorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractorConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_chars, 4000);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert!(config.openai_api_key.is_none());
        assert!(config.user_agent.contains("Mozilla"));
    }

    #[test]
    fn test_from_lookup_reads_keys_and_ignores_blank() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(OPENAI_API_KEY_VAR, " sk-live "), (SCRAPINGBEE_API_KEY_VAR, "   "), (MODEL_VAR, "gpt-4o")]);
        let config = ExtractorConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-live"));
        assert!(config.scrapingbee_api_key.is_none());
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ExtractorConfig::builder()
            .scrapingbee_api_key("bee")
            .render_wait_ms(0)
            .max_chars(100)
            .build();
        assert_eq!(config.scrapingbee_api_key.as_deref(), Some("bee"));
        assert_eq!(config.render_wait_ms, 0);
        assert_eq!(config.max_chars, 100);
    }
}
