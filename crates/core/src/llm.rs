//! Chat-completion client.
//!
//! [`CompletionModel`] is the seam the extractor and the suggestion service
//! talk to; [`OpenAiClient`] implements it against any OpenAI-compatible
//! `/chat/completions` endpoint.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fetch::build_client;
use crate::{ExtractorConfig, Result, ToolscoutError};

/// Chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with the given model.
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into(), messages: Vec::new(), temperature: None, max_tokens: None }
    }

    /// Add a message to the conversation.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".to_string(), content: content.into() }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponseRaw {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// A text-generation model reachable through chat completions.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Model name requests should carry.
    fn model(&self) -> &str;

    /// Sends `request` and returns the trimmed text of the first choice.
    ///
    /// Fails with [`ToolscoutError::ModelUnavailable`] without credentials and
    /// [`ToolscoutError::EmptyResponse`] when the reply has no text.
    async fn complete(&self, request: ChatRequest) -> Result<String>;
}

/// OpenAI-compatible chat-completion client.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            http_client: build_client(config.model_timeout)?,
            api_key: config.openai_api_key.clone(),
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// True when an API key is configured.
    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ToolscoutError::ModelUnavailable);
        };
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "completion request failed");
                ToolscoutError::ModelRequest(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "completion API error");
            return Err(ToolscoutError::ModelRequest(format!("status {}: {}", status.as_u16(), error_text)));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| ToolscoutError::ModelRequest(format!("unreadable completion payload: {}", e)))?;

        debug!(model = %request.model, duration_ms = start.elapsed().as_millis(), "chat completion");

        raw.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ToolscoutError::EmptyResponse)
    }
}

/// Strip a surrounding markdown code fence from a model reply.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").or_else(|| rest.strip_prefix("JSON")).unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}
