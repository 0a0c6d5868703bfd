use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use url::Url;

use super::{FetchStrategy, FetchedContent, build_client};
use crate::error::FetchError;
use crate::{ExtractorConfig, Result};

/// Pages at least this long are assumed to carry real static content.
const SPA_MAX_LEN: usize = 5000;

const SPA_MARKERS: &[&str] =
    &["window.__INITIAL_STATE__", "window.__APOLLO_STATE__", "id=\"root\"", "id=\"app\"", "ng-app"];

/// Fetches a page with a plain GET and browser-like headers.
pub struct DirectFetcher {
    client: Client,
    user_agent: String,
    timeout_secs: u64,
}

impl DirectFetcher {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.fetch_timeout)?,
            user_agent: config.user_agent.clone(),
            timeout_secs: config.fetch_timeout.as_secs(),
        })
    }
}

#[async_trait]
impl FetchStrategy for DirectFetcher {
    fn name(&self) -> &'static str {
        "Direct Fetch"
    }

    async fn fetch(&self, url: &Url) -> std::result::Result<FetchedContent, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header("User-Agent", &self.user_agent)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.5")
            .header("Cache-Control", "max-age=0")
            .send()
            .await
            .map_err(|e| FetchError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http { status: status.as_u16() });
        }

        let html = response
            .text()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        if looks_like_spa(&html) {
            return Err(FetchError::LikelySpa);
        }

        Ok(FetchedContent::Html(html))
    }
}

/// Heuristic for an unrendered single page application shell: a framework
/// mount point or bundle script combined with very little markup.
pub fn looks_like_spa(html: &str) -> bool {
    if html.trim().len() >= SPA_MAX_LEN {
        return false;
    }

    if SPA_MARKERS.iter().any(|marker| html.contains(marker)) {
        return true;
    }

    let bundle_script = Regex::new(r"(?i)<script[^>]*src[^>]*(app|bundle)[^>]*\.js").unwrap();
    bundle_script.is_match(html)
}
