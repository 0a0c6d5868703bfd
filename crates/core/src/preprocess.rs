use regex::Regex;

/// Tags whose whole subtree is dropped before text extraction.
pub const DEFAULT_REMOVED_TAGS: &[&str] = &["script", "style", "noscript", "template", "nav", "header", "footer", "aside"];

/// Configuration for HTML preprocessing
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Elements removed together with their content
    pub removed_tags: Vec<String>,
    /// Whether to remove HTML comments
    pub remove_comments: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { removed_tags: DEFAULT_REMOVED_TAGS.iter().map(|t| t.to_string()).collect(), remove_comments: true }
    }
}

/// Strip page chrome (scripts, styles, navigation, header, footer, asides) so
/// only content markup remains.
pub fn strip_boilerplate(html: &str, config: &PreprocessConfig) -> String {
    let mut processed = remove_tags(html, &config.removed_tags);

    if config.remove_comments {
        processed = remove_comments(&processed);
    }

    processed
}

/// Remove every element whose tag is in `tags`, content included
fn remove_tags(html: &str, tags: &[String]) -> String {
    if tags.is_empty() {
        return html.to_string();
    }

    let mut output = String::new();
    let mut rewriter = lol_html::HtmlRewriter::new(
        lol_html::Settings {
            element_content_handlers: tags
                .iter()
                .map(|tag| {
                    lol_html::element!(tag.as_str(), |el| {
                        el.remove();
                        Ok(())
                    })
                })
                .collect(),
            ..Default::default()
        },
        |c: &[u8]| {
            output.push_str(&String::from_utf8_lossy(c));
        },
    );

    if rewriter.write(html.as_bytes()).is_err() {
        return html.to_string();
    }

    if rewriter.end().is_err() {
        return html.to_string();
    }

    output
}

/// Remove HTML comments from the document
fn remove_comments(html: &str) -> String {
    let re = Regex::new(r"(?s)<!--.*?-->").unwrap();
    re.replace_all(html, "").to_string()
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
