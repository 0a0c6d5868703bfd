//! HTML parsing and DOM querying.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML and navigating the DOM tree using CSS selectors.
//!
//! # Example
//!
//! ```rust
//! use toolscout_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use scraper::{Html, Selector};
use url::Url;

use crate::{Result, ToolscoutError};

/// A parsed HTML document, optionally tied to the URL it came from.
///
/// # Example
///
/// ```rust
/// use toolscout_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html);
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string as-is.
    ///
    /// html5ever recovers from any malformed markup, so parsing cannot fail.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html), base_url: None }
    }

    /// Parses HTML and remembers the page URL for resolving relative links.
    pub fn parse_with_url(html: &str, base_url: Url) -> Self {
        Self { html: Html::parse_document(html), base_url: Some(base_url) }
    }

    /// Gets the base URL the document was parsed with.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ToolscoutError::InvalidInput`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use toolscout_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html);
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a selector, if any.
    pub fn select_first(&'_ self, selector: &str) -> Option<Element<'_>> {
        let sel = parse_selector(selector).ok()?;
        self.html.select(&sel).next().map(|el| Element { element: el })
    }

    /// Gets the trimmed content of the `<title>` element, if present and non-blank.
    pub fn title(&self) -> Option<String> {
        self.select_first("title").and_then(|el| non_blank(el.text()))
    }

    /// Gets the document's text with text nodes separated by spaces.
    pub fn text_content(&self) -> String {
        join_text(self.html.root_element().text())
    }
}

/// A wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use toolscout_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html);
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: scraper::ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the text content of this element with text nodes separated by spaces.
    pub fn text(&self) -> String {
        join_text(self.element.text())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ToolscoutError::InvalidInput(format!("Invalid selector: {}", e)))
}

fn join_text<'t>(nodes: impl Iterator<Item = &'t str>) -> String {
    let parts: Vec<&str> = nodes.map(str::trim).filter(|s| !s.is_empty()).collect();
    parts.join(" ")
}

pub(crate) fn non_blank(value: impl AsRef<str>) -> Option<String> {
    let trimmed = value.as_ref().trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title> Test Page </title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document_title_is_trimmed() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_blank_title_is_none() {
        let doc = Document::parse("<html><head><title>   </title></head></html>");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].tag_name(), "p");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ToolscoutError::InvalidInput(_))));
    }

    #[test]
    fn test_text_content_separates_blocks() {
        let doc = Document::parse("<html><body><p>one</p><p>two</p></body></html>");
        assert_eq!(doc.text_content(), "one two");
    }
}
