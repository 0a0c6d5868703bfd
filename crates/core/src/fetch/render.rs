use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use super::{FetchStrategy, FetchedContent, build_client};
use crate::error::FetchError;
use crate::{ExtractorConfig, Result};

/// Bodies shorter than this (after trimming) are treated as empty.
const MIN_RENDERED_CHARS: usize = 100;

/// Fetches pages through a browser-rendering scrape API with JavaScript enabled.
///
/// Without an API key the strategy fails with [`FetchError::Auth`] and makes
/// no request, so the orchestrator simply moves on.
pub struct RenderingProxyFetcher {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    wait_ms: u64,
    timeout_secs: u64,
}

impl RenderingProxyFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        // Rendering answers only after the settle delay.
        let timeout = config.fetch_timeout + std::time::Duration::from_millis(config.render_wait_ms);
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: config.render_endpoint.clone(),
            api_key: config.scrapingbee_api_key.clone(),
            wait_ms: config.render_wait_ms,
            timeout_secs: timeout.as_secs(),
        })
    }
}

#[async_trait]
impl FetchStrategy for RenderingProxyFetcher {
    fn name(&self) -> &'static str {
        "Browser API"
    }

    async fn fetch(&self, url: &Url) -> std::result::Result<FetchedContent, FetchError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FetchError::Auth("rendering proxy API key not configured".to_string()));
        };

        let wait = self.wait_ms.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("api_key", api_key),
                ("url", url.as_str()),
                ("render_js", "true"),
                ("premium_proxy", "true"),
                ("country_code", "us"),
                ("wait", wait.as_str()),
            ])
            .header("Accept", "text/html")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth(format!("rendering proxy rejected the API key ({})", status.as_u16())));
        }
        if !status.is_success() {
            return Err(FetchError::Upstream { status: status.as_u16() });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        debug!(url = %url, bytes = html.len(), "rendering proxy returned page");

        if html.trim().chars().count() < MIN_RENDERED_CHARS {
            return Err(FetchError::EmptyContent);
        }

        Ok(FetchedContent::Html(html))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn fetcher(server: &MockServer, api_key: Option<&str>) -> RenderingProxyFetcher {
        let mut builder = ExtractorConfig::builder().render_endpoint(server.url("/api/v1/")).render_wait_ms(0);
        if let Some(key) = api_key {
            builder = builder.scrapingbee_api_key(key);
        }
        RenderingProxyFetcher::new(&builder.build()).unwrap()
    }

    fn target() -> Url {
        Url::parse("https://acme.ai/").unwrap()
    }

    #[tokio::test]
    async fn test_sends_render_parameters() {
        let server = MockServer::start_async().await;
        let page = format!("<html><body><p>{}</p></body></html>", "Rendered content ".repeat(20));
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/")
                    .query_param("api_key", "bee-key")
                    .query_param("url", "https://acme.ai/")
                    .query_param("render_js", "true")
                    .query_param("premium_proxy", "true");
                then.status(200).body(page.clone());
            })
            .await;

        let content = fetcher(&server, Some("bee-key")).fetch(&target()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(content, FetchedContent::Html(page));
    }

    #[tokio::test]
    async fn test_missing_key_skips_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;

        let result = fetcher(&server, None).fetch(&target()).await;
        assert!(matches!(result, Err(FetchError::Auth(_))));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/");
                then.status(401).body("invalid api key");
            })
            .await;

        let result = fetcher(&server, Some("wrong")).fetch(&target()).await;
        assert!(matches!(result, Err(FetchError::Auth(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/");
                then.status(500);
            })
            .await;

        let result = fetcher(&server, Some("bee-key")).fetch(&target()).await;
        assert_eq!(result, Err(FetchError::Upstream { status: 500 }));
    }

    #[tokio::test]
    async fn test_tiny_body_is_empty_content() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/");
                then.status(200).body("<html></html>");
            })
            .await;

        let result = fetcher(&server, Some("bee-key")).fetch(&target()).await;
        assert_eq!(result, Err(FetchError::EmptyContent));
    }
}
