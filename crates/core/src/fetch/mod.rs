//! Page fetch strategies.
//!
//! Each strategy implements [`FetchStrategy`] and fails independently with a
//! [`FetchError`]. Strategies never retry; the orchestrator moves on to the
//! next one instead.
//!
//! - [`RenderingProxyFetcher`]: JS-rendering scrape API.
//! - [`ReadabilityProxyFetcher`]: readability content-extraction API.
//! - [`DirectFetcher`]: plain GET with browser-like headers.

mod direct;
mod logo;
mod readability;
mod render;

pub use direct::{DirectFetcher, looks_like_spa};
pub use logo::{LOGO_PATHS, LogoProbe, find_logo};
pub use readability::ReadabilityProxyFetcher;
pub use render::RenderingProxyFetcher;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::FetchError;
use crate::{Result, ToolscoutError};

/// Text that marks a page as a bot wall, JS gate, or rate-limit notice.
pub const BLOCKED_SIGNATURES: &[&str] = &[
    "JavaScript and Cookies Enablement",
    "Enable JavaScript and cookies to continue",
    "JavaScript is required",
    "Please enable JavaScript",
    "Access Denied",
    "403 Forbidden",
    "Rate Limited",
];

/// Content produced by a fetch strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchedContent {
    /// Raw page markup that still needs normalization.
    Html(String),
    /// Main content already extracted by a readability service.
    Readable { title: String, excerpt: String, text: String },
}

impl FetchedContent {
    /// True when the payload carries no visible characters.
    pub fn is_blank(&self) -> bool {
        match self {
            FetchedContent::Html(html) => html.trim().is_empty(),
            FetchedContent::Readable { title, excerpt, text } => {
                title.trim().is_empty() && excerpt.trim().is_empty() && text.trim().is_empty()
            }
        }
    }
}

/// One way of retrieving page content for a URL.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Human-readable strategy name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Fetches content for `url`.
    async fn fetch(&self, url: &Url) -> std::result::Result<FetchedContent, FetchError>;
}

/// Returns the first blocked signature found in `text`, if any.
pub fn detect_blocked(text: &str) -> Option<&'static str> {
    BLOCKED_SIGNATURES.iter().copied().find(|signature| text.contains(signature))
}

/// Parses and validates an extraction target.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
pub fn parse_target(url: &str) -> Result<Url> {
    let parsed = Url::parse(url.trim()).map_err(|e| ToolscoutError::InvalidInput(format!("{}: {}", url, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ToolscoutError::InvalidInput(format!(
            "URL must use http:// or https://, got {}://",
            parsed.scheme()
        )));
    }

    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(ToolscoutError::InvalidInput(format!("URL has no host: {}", url)));
    }

    Ok(parsed)
}

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ToolscoutError::Config(format!("failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("<p>Please enable JavaScript to view this page</p>", Some("Please enable JavaScript"))]
    #[case("Enable JavaScript and cookies to continue", Some("Enable JavaScript and cookies to continue"))]
    #[case("<h1>403 Forbidden</h1>", Some("403 Forbidden"))]
    #[case("You have been Rate Limited", Some("Rate Limited"))]
    #[case("<h1>Acme writes emails</h1>", None)]
    fn test_detect_blocked(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(detect_blocked(text), expected);
    }

    #[rstest]
    #[case("https://example.com")]
    #[case("http://example.com/tools?id=1")]
    #[case("  https://example.com/page  ")]
    fn test_parse_target_accepts(#[case] url: &str) {
        assert!(parse_target(url).is_ok());
    }

    #[rstest]
    #[case("not-a-url")]
    #[case("example.com")]
    #[case("ftp://example.com/file")]
    #[case("mailto:someone@example.com")]
    #[case("")]
    fn test_parse_target_rejects(#[case] url: &str) {
        assert!(matches!(parse_target(url), Err(ToolscoutError::InvalidInput(_))));
    }

    #[test]
    fn test_fetched_content_blank() {
        assert!(FetchedContent::Html("  \n ".to_string()).is_blank());
        assert!(!FetchedContent::Html("<p>x</p>".to_string()).is_blank());
        let readable = FetchedContent::Readable { title: String::new(), excerpt: " ".to_string(), text: String::new() };
        assert!(readable.is_blank());
    }
}
