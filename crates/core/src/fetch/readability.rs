use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{FetchStrategy, FetchedContent, build_client};
use crate::error::FetchError;
use crate::normalize::html_to_text;
use crate::{ExtractorConfig, Result};

/// Payload returned by the readability service.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadabilityResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    text_content: Option<String>,
    /// Main content as HTML.
    #[serde(default)]
    content: Option<String>,
}

/// Fetches the main content of a page through a readability extraction service.
pub struct ReadabilityProxyFetcher {
    client: Client,
    endpoint: String,
    timeout_secs: u64,
}

impl ReadabilityProxyFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.fetch_timeout)?,
            endpoint: config.readability_endpoint.clone(),
            timeout_secs: config.fetch_timeout.as_secs(),
        })
    }
}

#[async_trait]
impl FetchStrategy for ReadabilityProxyFetcher {
    fn name(&self) -> &'static str {
        "Readability API"
    }

    async fn fetch(&self, url: &Url) -> std::result::Result<FetchedContent, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url.as_str()), ("html", "true")])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream { status: status.as_u16() });
        }

        let body: ReadabilityResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let text = match (body.text_content.filter(|t| !t.trim().is_empty()), body.content) {
            (Some(text), _) => text,
            (None, Some(html)) if !html.trim().is_empty() => html_to_text(&html),
            _ => return Err(FetchError::NoContentExtracted),
        };

        if text.trim().is_empty() {
            return Err(FetchError::NoContentExtracted);
        }

        Ok(FetchedContent::Readable {
            title: body.title.unwrap_or_default(),
            excerpt: body.excerpt.unwrap_or_default(),
            text,
        })
    }
}
