use url::Url;

use crate::Document;
use crate::parse::non_blank;

/// Best-effort page metadata used to seed a tool record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute logo URL
    pub logo_url: Option<String>,
}

impl Document {
    /// Extract title with priority fallback:
    /// 1. `<title>` element
    /// 2. First `<h1>` element
    pub fn extract_title(&self) -> Option<String> {
        if let Some(title) = self.title() {
            return Some(title);
        }

        self.select_first("h1").and_then(|h1| non_blank(h1.text()))
    }

    /// Extract description with priority fallback:
    /// 1. Meta `description`
    /// 2. Open Graph `og:description`
    pub fn extract_description(&self) -> Option<String> {
        self.get_meta_content("description").or_else(|| self.get_meta_content("og:description"))
    }

    /// Extract a logo reference with priority fallback, resolved to an absolute URL:
    /// 1. Open Graph `og:image`
    /// 2. Icon links (`icon`, `shortcut icon`, `apple-touch-icon`)
    /// 3. First `<img>` whose alt text mentions "logo"
    ///
    /// Candidates that cannot be resolved to http(s) are skipped.
    pub fn extract_logo(&self) -> Option<String> {
        let base = self.base_url();

        if let Some(logo) = self.get_meta_content("og:image").and_then(|href| resolve_url(&href, base)) {
            return Some(logo);
        }

        if let Ok(links) = self.select("link[rel][href]") {
            for link in links {
                let is_icon = link
                    .attr("rel")
                    .map(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("icon") || r.eq_ignore_ascii_case("apple-touch-icon")))
                    .unwrap_or(false);
                if is_icon
                    && let Some(href) = link.attr("href")
                    && let Some(logo) = resolve_url(href, base)
                {
                    return Some(logo);
                }
            }
        }

        if let Ok(images) = self.select("img[alt][src]") {
            for img in images {
                let mentions_logo = img.attr("alt").map(|alt| alt.to_lowercase().contains("logo")).unwrap_or(false);
                if mentions_logo
                    && let Some(src) = img.attr("src")
                    && let Some(logo) = resolve_url(src, base)
                {
                    return Some(logo);
                }
            }
        }

        None
    }

    /// Extract all page metadata at once
    pub fn extract_page_metadata(&self) -> PageMetadata {
        PageMetadata {
            title: self.extract_title(),
            description: self.extract_description(),
            logo_url: self.extract_logo(),
        }
    }

    /// Get meta tag content by name or property attribute
    fn get_meta_content(&self, attr: &str) -> Option<String> {
        let selector = format!("meta[name=\"{}\"]", attr);
        if let Some(el) = self.select_first(&selector)
            && let Some(content) = el.attr("content").and_then(non_blank)
        {
            return Some(content);
        }

        let selector = format!("meta[property=\"{}\"]", attr);
        if let Some(el) = self.select_first(&selector)
            && let Some(content) = el.attr("content").and_then(non_blank)
        {
            return Some(content);
        }

        None
    }
}

/// Resolve a possibly relative reference against `base`.
///
/// Returns `None` for blank input, unparseable references, relative references
/// without a base, and anything that does not end up http(s) (`data:`,
/// `javascript:` and the like).
pub fn resolve_url(reference: &str, base: Option<&Url>) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    let resolved = match base {
        Some(base) => base.join(reference).ok()?,
        None => Url::parse(reference).ok()?,
    };

    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
