//! Turning fetched markup into a bounded, prompt-ready page summary.
//!
//! [`normalize`] strips page chrome, reads title / description / logo, and
//! produces a plain-text excerpt capped at [`DEFAULT_MAX_CHARS`] characters.

use url::Url;

use crate::parse::non_blank;
use crate::preprocess::{PreprocessConfig, collapse_whitespace, strip_boilerplate};
use crate::{Document, Result, ToolscoutError};

/// Default character budget for the body excerpt.
pub const DEFAULT_MAX_CHARS: usize = 4000;

/// Configuration for [`normalize_with_config`].
#[derive(Debug, Clone)]
pub struct NormalizeConfig {
    /// Maximum number of characters kept from the body text.
    pub max_chars: usize,
    /// Markup removed before text extraction.
    pub preprocess: PreprocessConfig,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self { max_chars: DEFAULT_MAX_CHARS, preprocess: PreprocessConfig::default() }
    }
}

/// Normalized page content handed to the structured-data extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPageContent {
    /// Page title, empty when none was found.
    pub title: String,
    /// Meta description, empty when none was found.
    pub meta_description: String,
    /// Whitespace-collapsed body excerpt, at most `max_chars` characters.
    pub body_text: String,
    /// Absolute logo URL discovered on the page.
    pub logo_url: Option<String>,
    /// The page the content came from.
    pub source_url: Url,
}

impl RawPageContent {
    /// Builds page content from a readability service payload.
    ///
    /// `text` is already plain text; it is only whitespace-collapsed and truncated.
    pub fn from_readable(title: &str, excerpt: &str, text: &str, source_url: Url, max_chars: usize) -> Self {
        Self {
            title: title.trim().to_string(),
            meta_description: collapse_whitespace(excerpt),
            body_text: truncate_excerpt(&collapse_whitespace(text), max_chars),
            logo_url: None,
            source_url,
        }
    }

    /// True when no title, description, or body text survived normalization.
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.meta_description.is_empty() && self.body_text.is_empty()
    }
}

/// Normalizes raw HTML fetched from `source_url` using the default budget.
///
/// # Example
///
/// ```rust
/// use toolscout_core::normalize;
///
/// let html = "<html><head><title>Acme</title></head><body><nav>Menu</nav><main>Writes emails.</main></body></html>";
/// let page = normalize(html, "https://acme.ai").unwrap();
/// assert_eq!(page.title, "Acme");
/// assert_eq!(page.body_text, "Writes emails.");
/// ```
pub fn normalize(raw_html: &str, source_url: &str) -> Result<RawPageContent> {
    let url = Url::parse(source_url).map_err(|e| ToolscoutError::InvalidInput(format!("{}: {}", source_url, e)))?;
    Ok(normalize_with_config(raw_html, &url, &NormalizeConfig::default()))
}

/// Normalizes raw HTML with an explicit configuration.
pub fn normalize_with_config(raw_html: &str, source_url: &Url, config: &NormalizeConfig) -> RawPageContent {
    // Metadata comes from the full document: logos often live in the header.
    let full = Document::parse_with_url(raw_html, source_url.clone());
    let metadata = full.extract_page_metadata();

    let stripped = strip_boilerplate(raw_html, &config.preprocess);
    let content = Document::parse(&stripped);
    let body = main_region_text(&content);

    RawPageContent {
        title: metadata.title.unwrap_or_default(),
        meta_description: metadata.description.map(|d| collapse_whitespace(&d)).unwrap_or_default(),
        body_text: truncate_excerpt(&collapse_whitespace(&body), config.max_chars),
        logo_url: metadata.logo_url,
        source_url: source_url.clone(),
    }
}

/// Reduce an HTML fragment to collapsed plain text.
pub fn html_to_text(html: &str) -> String {
    let stripped = strip_boilerplate(html, &PreprocessConfig::default());
    collapse_whitespace(&Document::parse(&stripped).text_content())
}

fn main_region_text(doc: &Document) -> String {
    for selector in ["main", "[role=\"main\"]", "body"] {
        if let Some(region) = doc.select_first(selector)
            && let Some(text) = non_blank(region.text())
        {
            return text;
        }
    }
    doc.text_content()
}

/// Truncate `text` to at most `max_chars` characters.
///
/// The cut never splits a UTF-8 character, and when it lands inside a word the
/// partial word is dropped as long as an earlier space exists.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };

    let head = &text[..cut];
    let mid_word = !text[cut..].starts_with(char::is_whitespace) && !head.ends_with(char::is_whitespace);

    if mid_word && let Some(space) = head.rfind(char::is_whitespace) {
        return head[..space].trim_end().to_string();
    }

    head.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL_PAGE: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <title>Acme AI</title>
            <meta name="description" content="Acme   writes
                your emails.">
            <script>window.track = true;</script>
        </head>
        <body>
            <header><img src="/logo.svg" alt="Acme logo"> Sign in</header>
            <nav>Home Pricing Blog</nav>
            <main>
                <h1>Write emails in seconds</h1>
                <p>Acme drafts replies   for you.</p>
            </main>
            <aside>Ads</aside>
            <footer>© Acme</footer>
        </body>
        </html>
    "#;

    fn source() -> Url {
        Url::parse("https://acme.ai/landing").unwrap()
    }

    #[test]
    fn test_normalize_tool_page() {
        let page = normalize_with_config(TOOL_PAGE, &source(), &NormalizeConfig::default());

        assert_eq!(page.title, "Acme AI");
        assert_eq!(page.meta_description, "Acme writes your emails.");
        assert_eq!(page.body_text, "Write emails in seconds Acme drafts replies for you.");
        assert_eq!(page.logo_url, Some("https://acme.ai/logo.svg".to_string()));
        assert_eq!(page.source_url, source());
    }

    #[test]
    fn test_normalize_uses_body_without_main() {
        let html = "<html><body><nav>Menu</nav><div><p>Plain   site</p></div><footer>f</footer></body></html>";
        let page = normalize_with_config(html, &source(), &NormalizeConfig::default());
        assert_eq!(page.body_text, "Plain site");
        assert_eq!(page.title, "");
    }

    #[test]
    fn test_normalize_role_main() {
        let html = r#"<html><body><div>Outside</div><div role="main">Inside</div></body></html>"#;
        let page = normalize_with_config(html, &source(), &NormalizeConfig::default());
        assert_eq!(page.body_text, "Inside");
    }

    #[test]
    fn test_normalize_respects_budget() {
        let html = format!("<html><body><main>{}</main></body></html>", "word ".repeat(2000));
        let page = normalize_with_config(&html, &source(), &NormalizeConfig::default());
        assert!(page.body_text.chars().count() <= DEFAULT_MAX_CHARS);
        assert!(page.body_text.ends_with("word"));
    }

    #[test]
    fn test_normalize_rejects_bad_url() {
        assert!(matches!(normalize("<p>x</p>", "not a url"), Err(ToolscoutError::InvalidInput(_))));
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_excerpt("short text", 100), "short text");
    }

    #[test]
    fn test_truncate_drops_partial_word() {
        assert_eq!(truncate_excerpt("alpha beta gamma", 8), "alpha");
        assert_eq!(truncate_excerpt("alpha beta gamma", 10), "alpha beta");
    }

    #[test]
    fn test_truncate_single_long_word_is_cut() {
        assert_eq!(truncate_excerpt("abcdefghij", 4), "abcd");
    }

    #[test]
    fn test_truncate_is_char_boundary_safe() {
        let text = "ééééé";
        assert_eq!(truncate_excerpt(text, 3), "ééé");
    }

    #[test]
    fn test_from_readable() {
        let page = RawPageContent::from_readable(" Title ", "An  excerpt", "body   text here", source(), 9);
        assert_eq!(page.title, "Title");
        assert_eq!(page.meta_description, "An excerpt");
        assert_eq!(page.body_text, "body text");
        assert!(page.logo_url.is_none());
    }

    #[test]
    fn test_html_to_text() {
        assert_eq!(html_to_text("<div><p>One</p><script>x()</script><p>Two</p></div>"), "One Two");
    }

    #[test]
    fn test_is_empty() {
        let page = normalize_with_config("<html><body><nav>only nav</nav></body></html>", &source(), &NormalizeConfig::default());
        assert!(page.is_empty());
    }
}
