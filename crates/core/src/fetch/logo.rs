use reqwest::Client;
use tracing::debug;
use url::Url;

use super::{build_client, parse_target};
use crate::{ExtractorConfig, Result};

/// Conventional logo locations probed on the site origin, in order.
pub const LOGO_PATHS: &[&str] = &[
    "/logo.png",
    "/logo.svg",
    "/favicon.ico",
    "/assets/logo.png",
    "/static/logo.png",
    "/images/logo.png",
];

/// Finds a site logo by probing conventional paths with HEAD requests.
pub struct LogoProbe {
    client: Client,
    user_agent: String,
}

impl LogoProbe {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self { client: build_client(config.fetch_timeout)?, user_agent: config.user_agent.clone() })
    }

    /// Candidate logo URLs for the origin of `url`, in probe order.
    pub fn candidates(url: &Url) -> Vec<Url> {
        LOGO_PATHS.iter().filter_map(|path| url.join(path).ok()).collect()
    }

    /// Returns the first candidate that answers a HEAD request with 2xx.
    ///
    /// Unreachable candidates are skipped; `Ok(None)` means none responded.
    pub async fn find_logo(&self, url: &str) -> Result<Option<String>> {
        let target = parse_target(url)?;

        for candidate in Self::candidates(&target) {
            match self.client.head(candidate.clone()).header("User-Agent", &self.user_agent).send().await {
                Ok(response) if response.status().is_success() => return Ok(Some(candidate.to_string())),
                Ok(response) => debug!(candidate = %candidate, status = %response.status(), "logo candidate missing"),
                Err(e) => debug!(candidate = %candidate, error = %e, "logo candidate unreachable"),
            }
        }

        Ok(None)
    }
}

/// Probes conventional logo paths for `url` with the default configuration.
pub async fn find_logo(url: &str) -> Result<Option<String>> {
    LogoProbe::new(&ExtractorConfig::default())?.find_logo(url).await
}
