//! Error types for toolscout operations.
//!
//! Two layers are defined here. [`FetchError`] describes why a single fetch
//! strategy could not produce usable content; the orchestrator records it and
//! moves on to the next strategy. [`ToolscoutError`] is what callers of the
//! library see.
//!
//! # Example
//!
//! ```rust
//! use toolscout_core::{Result, ToolscoutError};
//!
//! fn check(url: &str) -> Result<()> {
//!     if url.is_empty() {
//!         return Err(ToolscoutError::InvalidInput("empty URL".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Hint appended to an exhausted extraction so the form can fall back to manual entry.
pub const MANUAL_ENTRY_HINT: &str = "Please fill in the tool details manually.";

/// Failure of one fetch strategy.
///
/// None of these are fatal to an extraction; they make the orchestrator
/// advance to the next strategy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The service rejected or lacks credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A proxy service answered with a non-2xx status.
    #[error("upstream service returned status {status}")]
    Upstream { status: u16 },

    /// The target site answered with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The payload was empty or close to it.
    #[error("no content returned")]
    EmptyContent,

    /// The readability service found no main content.
    #[error("no content extracted by readability service")]
    NoContentExtracted,

    /// Markup looks like an unrendered single page application shell.
    #[error("page appears to be a JavaScript single page application with minimal static content")]
    LikelySpa,

    /// The payload matched a known block / needs-JS / rate-limit page.
    #[error("content blocked: page says \"{signature}\"")]
    Blocked { signature: String },

    /// Connection, DNS, or TLS failure.
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("request timed out after {secs} seconds")]
    Timeout { secs: u64 },

    /// Response body could not be decoded.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Maps a transport error, keeping timeouts distinct.
    pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() { FetchError::Timeout { secs: timeout_secs } } else { FetchError::Network(err.to_string()) }
    }
}

/// Main error type for toolscout operations.
///
/// # Example
///
/// ```rust,no_run
/// use toolscout_core::{Extractor, ExtractorConfig, ToolscoutError};
///
/// # async fn run() {
/// let extractor = Extractor::from_config(&ExtractorConfig::default()).unwrap();
/// match extractor.extract("https://example.com").await {
///     Ok(record) => println!("{}", record.name),
///     Err(err @ ToolscoutError::ExtractionFailed { .. }) => eprintln!("{err}"),
///     Err(err) => eprintln!("error: {err}"),
/// }
/// # }
/// ```
#[derive(Error, Debug)]
pub enum ToolscoutError {
    /// Malformed input, e.g. a URL that is not absolute http(s).
    ///
    /// Raised before any network call is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Every fetch strategy failed.
    ///
    /// `reason` names the last strategy and its failure. This is a reported
    /// condition: the caller should let the user continue by hand.
    #[error("All extraction methods failed. Last error: {reason}. {hint}", hint = MANUAL_ENTRY_HINT)]
    ExtractionFailed { reason: String },

    /// No API credential for the text-generation model.
    #[error("Text-generation model unavailable: no API key configured")]
    ModelUnavailable,

    /// The model returned no content.
    #[error("No response from the text-generation model")]
    EmptyResponse,

    /// The model reply was not the expected JSON object.
    #[error("Failed to parse model response as JSON: {0}")]
    MalformedResponse(String),

    /// The completion request itself failed (transport or non-2xx).
    #[error("Model request failed: {0}")]
    ModelRequest(String),

    /// A record was built with a required field left empty.
    #[error("Incomplete tool record: `{field}` must not be empty")]
    IncompleteRecord { field: &'static str },

    /// A single strategy failure surfaced directly (e.g. from the logo probe).
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Invalid configuration, such as an unparseable endpoint.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for ToolscoutError.
pub type Result<T> = std::result::Result<T, ToolscoutError>;
