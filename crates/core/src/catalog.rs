//! Catalog entries and the search/filter engine.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{PricingTier, Result, ToolscoutError};

/// Licensing model of a cataloged tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SourceType {
    #[serde(rename = "Open Source")]
    OpenSource,
    #[serde(rename = "Closed Source")]
    ClosedSource,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::OpenSource => "Open Source",
            SourceType::ClosedSource => "Closed Source",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "open source" | "open" => Ok(Self::OpenSource),
            "closed source" | "closed" => Ok(Self::ClosedSource),
            _ => Err(format!("Invalid source: {}. Valid options: open-source, closed-source", s)),
        }
    }
}

/// A user comment on a cataloged tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolComment {
    pub id: String,
    pub tool_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub text: String,
    pub upvotes: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A published tool in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCatalogEntry {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub short_description: String,
    pub full_description: String,
    pub website_url: String,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub use_cases: Vec<String>,
    pub upvotes: u32,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub pricing: PricingTier,
    pub source: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_guide: Option<String>,
    #[serde(default)]
    pub comments: Vec<ToolComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Parses a catalog snapshot from a JSON array of entries.
pub fn load_catalog(json: &str) -> Result<Vec<ToolCatalogEntry>> {
    serde_json::from_str(json).map_err(|e| ToolscoutError::InvalidInput(format!("invalid catalog JSON: {}", e)))
}

/// Criteria for [`filter_catalog`]. Empty sets and a blank search term impose
/// no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub search_term: String,
    pub categories: BTreeSet<String>,
    pub pricing: BTreeSet<PricingTier>,
    pub sources: BTreeSet<SourceType>,
}

impl FilterSpec {
    pub fn builder() -> FilterSpecBuilder {
        FilterSpecBuilder::default()
    }

    /// True when nothing is filtered out.
    pub fn is_unconstrained(&self) -> bool {
        self.search_term.trim().is_empty()
            && self.categories.is_empty()
            && self.pricing.is_empty()
            && self.sources.is_empty()
    }

    /// Whether `entry` satisfies every dimension.
    pub fn matches(&self, entry: &ToolCatalogEntry) -> bool {
        self.matches_search(entry)
            && (self.categories.is_empty() || entry.categories.iter().any(|c| self.categories.contains(c)))
            && (self.pricing.is_empty() || self.pricing.contains(&entry.pricing))
            && (self.sources.is_empty() || self.sources.contains(&entry.source))
    }

    fn matches_search(&self, entry: &ToolCatalogEntry) -> bool {
        let term = self.search_term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }

        entry.name.to_lowercase().contains(&term)
            || entry.short_description.to_lowercase().contains(&term)
            || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
    }
}

/// Builder for [`FilterSpec`].
#[derive(Debug, Default)]
pub struct FilterSpecBuilder {
    spec: FilterSpec,
}

impl FilterSpecBuilder {
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.spec.search_term = term.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.spec.categories.insert(category.into());
        self
    }

    pub fn categories(mut self, categories: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.spec.categories.extend(categories.into_iter().map(Into::into));
        self
    }

    pub fn pricing(mut self, tier: PricingTier) -> Self {
        self.spec.pricing.insert(tier);
        self
    }

    pub fn pricing_tiers(mut self, tiers: impl IntoIterator<Item = PricingTier>) -> Self {
        self.spec.pricing.extend(tiers);
        self
    }

    pub fn source(mut self, source: SourceType) -> Self {
        self.spec.sources.insert(source);
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = SourceType>) -> Self {
        self.spec.sources.extend(sources);
        self
    }

    pub fn build(self) -> FilterSpec {
        self.spec
    }
}

/// Returns the entries matching `spec`, most upvoted first.
///
/// Entries with equal upvotes keep their catalog order.
///
/// # Example
///
/// ```rust
/// use toolscout_core::{FilterSpec, filter_catalog};
///
/// let shown = filter_catalog(&[], &FilterSpec::builder().search_term("chat").build());
/// assert!(shown.is_empty());
/// ```
pub fn filter_catalog(catalog: &[ToolCatalogEntry], spec: &FilterSpec) -> Vec<ToolCatalogEntry> {
    let mut shown: Vec<ToolCatalogEntry> = catalog.iter().filter(|entry| spec.matches(entry)).cloned().collect();
    shown.sort_by(|a, b| b.upvotes.cmp(&a.upvotes));
    shown
}
