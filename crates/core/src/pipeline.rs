//! Fallback extraction pipeline.
//!
//! [`Extractor::extract`] tries each [`FetchStrategy`] in order, stops at the
//! first usable page, and hands it to the [`StructuredExtractor`]. When every
//! strategy fails the caller gets [`ToolscoutError::ExtractionFailed`] carrying
//! the last failure.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::error::FetchError;
use crate::fetch::{
    DirectFetcher, FetchStrategy, FetchedContent, ReadabilityProxyFetcher, RenderingProxyFetcher, detect_blocked,
    parse_target,
};
use crate::infer::StructuredExtractor;
use crate::llm::{CompletionModel, OpenAiClient};
use crate::normalize::{NormalizeConfig, RawPageContent, normalize_with_config};
use crate::{ExtractedToolRecord, ExtractorConfig, Result, ToolscoutError};

/// Visible body length above which a signature found only in hidden markup
/// (e.g. a `<noscript>` notice) does not reject the page.
const MIN_BODY_CHARS_OVER_HIDDEN_SIGNATURE: usize = 200;

/// Orchestrates fetch strategies and structured extraction for one URL at a time.
pub struct Extractor {
    strategies: Vec<Box<dyn FetchStrategy>>,
    extractor: StructuredExtractor,
    normalize: NormalizeConfig,
}

impl Extractor {
    pub fn builder() -> ExtractorBuilder {
        ExtractorBuilder::new()
    }

    /// Wires the default strategies (rendering proxy, readability proxy,
    /// direct fetch) and an OpenAI-compatible model from `config`.
    pub fn from_config(config: &ExtractorConfig) -> Result<Self> {
        ExtractorBuilder::new()
            .strategy(RenderingProxyFetcher::new(config)?)
            .strategy(ReadabilityProxyFetcher::new(config)?)
            .strategy(DirectFetcher::new(config)?)
            .model(Arc::new(OpenAiClient::new(config)?))
            .max_chars(config.max_chars)
            .build()
    }

    /// Strategy names in the order they are tried.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Extracts a structured record for `url`.
    ///
    /// # Errors
    ///
    /// - [`ToolscoutError::InvalidInput`] for a malformed or non-http(s) URL; no strategy runs
    /// - [`ToolscoutError::ExtractionFailed`] when no strategy produced a usable page
    /// - any model or reply error from the extraction stage
    pub async fn extract(&self, url: &str) -> Result<ExtractedToolRecord> {
        let target = parse_target(url)?;
        let (method, page) = self.fetch_page(&target).await?;
        info!(url = %target, method, "extracting structured data");
        self.extractor.infer_via(&page, Some(method)).await
    }

    /// Runs the strategies in order and returns the first usable page with
    /// the name of the strategy that produced it.
    pub async fn fetch_page(&self, target: &Url) -> Result<(&'static str, RawPageContent)> {
        let mut last_failure: Option<String> = None;

        for strategy in &self.strategies {
            let name = strategy.name();
            info!(url = %target, method = name, "trying fetch strategy");

            let outcome = match strategy.fetch(target).await {
                Ok(content) => self.usable_page(content, target),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(page) => {
                    info!(method = name, chars = page.body_text.chars().count(), "fetch strategy succeeded");
                    return Ok((name, page));
                }
                Err(e) => {
                    warn!(method = name, error = %e, "fetch strategy failed");
                    last_failure = Some(format!("{}: {}", name, e));
                }
            }
        }

        Err(ToolscoutError::ExtractionFailed {
            reason: last_failure.unwrap_or_else(|| "no fetch strategies configured".to_string()),
        })
    }

    fn usable_page(&self, content: FetchedContent, target: &Url) -> std::result::Result<RawPageContent, FetchError> {
        if content.is_blank() {
            return Err(FetchError::EmptyContent);
        }

        let (page, markup_signature) = match content {
            FetchedContent::Html(html) => (normalize_with_config(&html, target, &self.normalize), detect_blocked(&html)),
            FetchedContent::Readable { title, excerpt, text } => (
                RawPageContent::from_readable(&title, &excerpt, &text, target.clone(), self.normalize.max_chars),
                None,
            ),
        };

        let visible = format!("{}\n{}\n{}", page.title, page.meta_description, page.body_text);
        if let Some(signature) = detect_blocked(&visible) {
            return Err(FetchError::Blocked { signature: signature.to_string() });
        }

        // Challenge pages hide their notice in markup and show almost no text.
        if let Some(signature) = markup_signature
            && page.body_text.chars().count() < MIN_BODY_CHARS_OVER_HIDDEN_SIGNATURE
        {
            return Err(FetchError::Blocked { signature: signature.to_string() });
        }

        if page.is_empty() {
            return Err(FetchError::EmptyContent);
        }

        Ok(page)
    }
}

/// Builder for [`Extractor`].
///
/// Strategies run in the order they are added.
#[derive(Default)]
pub struct ExtractorBuilder {
    strategies: Vec<Box<dyn FetchStrategy>>,
    model: Option<Arc<dyn CompletionModel>>,
    normalize: NormalizeConfig,
}

impl ExtractorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strategy(mut self, strategy: impl FetchStrategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn max_chars(mut self, max_chars: usize) -> Self {
        self.normalize.max_chars = max_chars;
        self
    }

    pub fn normalize_config(mut self, config: NormalizeConfig) -> Self {
        self.normalize = config;
        self
    }

    pub fn build(self) -> Result<Extractor> {
        let model = self
            .model
            .ok_or_else(|| ToolscoutError::Config("extractor needs a completion model".to_string()))?;
        Ok(Extractor { strategies: self.strategies, extractor: StructuredExtractor::new(model), normalize: self.normalize })
    }
}

/// Ordinal handed out by [`AttemptTracker::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptTicket(u64);

/// Tracks which of several overlapping extraction attempts is the newest.
///
/// A result may only be written back when its ticket is still current, so a
/// slow earlier attempt cannot overwrite a later one.
#[derive(Debug, Default)]
pub struct AttemptTracker {
    latest: u64,
}

impl AttemptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new attempt, superseding all earlier ones.
    pub fn begin(&mut self) -> AttemptTicket {
        self.latest += 1;
        AttemptTicket(self.latest)
    }

    pub fn is_current(&self, ticket: AttemptTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Stores `value` into `slot` if `ticket` is current. Returns whether it did.
    pub fn commit<T>(&self, ticket: AttemptTicket, value: T, slot: &mut Option<T>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        *slot = Some(value);
        true
    }
}
