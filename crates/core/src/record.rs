//! Structured tool records produced by extraction.
//!
//! An [`ExtractedToolRecord`] can only be obtained through
//! [`ExtractedToolRecordBuilder::build`], which refuses records with an empty
//! name, description, or list. Placeholder values for missing data live here
//! too so every producer fills gaps the same way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Result, ToolscoutError};

pub const DEFAULT_NAME: &str = "Unknown Product";
pub const DEFAULT_DESCRIPTION: &str = "No description available";
pub const DEFAULT_FEATURE: &str = "Feature information not available";
pub const DEFAULT_USE_CASE: &str = "Use case information not available";
pub const DEFAULT_TAG: &str = "general";

/// Pricing model of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PricingTier {
    Free,
    Freemium,
    Paid,
    #[serde(rename = "Contact Us")]
    ContactUs,
}

impl PricingTier {
    pub const ALL: [PricingTier; 4] = [PricingTier::Free, PricingTier::Freemium, PricingTier::Paid, PricingTier::ContactUs];

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingTier::Free => "Free",
            PricingTier::Freemium => "Freemium",
            PricingTier::Paid => "Paid",
            PricingTier::ContactUs => "Contact Us",
        }
    }

    /// Lenient reading of free-form pricing text such as a model reply.
    ///
    /// Order matters: "freemium" before "free", and "free trial" counts as paid.
    pub fn infer(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if lower.contains("freemium") || lower.contains("free tier") || lower.contains("free plan") {
            return Some(PricingTier::Freemium);
        }
        if lower.contains("contact") || lower.contains("enterprise") || lower.contains("quote") {
            return Some(PricingTier::ContactUs);
        }
        if lower.contains("free trial") {
            return Some(PricingTier::Paid);
        }
        if lower.contains("free") || lower.contains("open source") {
            return Some(PricingTier::Free);
        }
        if lower.contains("paid") || lower.contains("subscription") || lower.contains("premium") || lower.contains('$') {
            return Some(PricingTier::Paid);
        }
        None
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingTier {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "free" => Ok(Self::Free),
            "freemium" => Ok(Self::Freemium),
            "paid" => Ok(Self::Paid),
            "contact us" | "contactus" | "contact" => Ok(Self::ContactUs),
            _ => Err(format!("Invalid pricing: {}. Valid options: free, freemium, paid, contact-us", s)),
        }
    }
}

/// Structured record inferred from a tool's website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedToolRecord {
    pub name: String,
    pub description: String,
    pub features: Vec<String>,
    pub use_cases: Vec<String>,
    pub pricing: PricingTier,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl ExtractedToolRecord {
    pub fn builder() -> ExtractedToolRecordBuilder {
        ExtractedToolRecordBuilder::default()
    }

    /// Converts the record to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| ToolscoutError::Config(format!("failed to serialize record: {}", e)))
    }

    /// Renders the record as plain text for terminals.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Name: {}\n", self.name));
        out.push_str(&format!("Description: {}\n", self.description));
        out.push_str(&format!("Pricing: {}\n", self.pricing));
        if let Some(logo) = &self.logo_url {
            out.push_str(&format!("Logo: {}\n", logo));
        }
        push_list(&mut out, "Features", &self.features);
        push_list(&mut out, "Use cases", &self.use_cases);
        out.push_str(&format!("Tags: {}\n", self.tags.join(", ")));
        out
    }
}

fn push_list(out: &mut String, label: &str, items: &[String]) {
    out.push_str(label);
    out.push_str(":\n");
    for item in items {
        out.push_str("  - ");
        out.push_str(item);
        out.push('\n');
    }
}

/// Builder for ExtractedToolRecord.
///
/// # Example
///
/// ```rust
/// use toolscout_core::{ExtractedToolRecord, PricingTier};
///
/// let record = ExtractedToolRecord::builder()
///     .name("Acme")
///     .description("Writes emails.")
///     .feature("Drafts replies")
///     .use_case("Busy founders")
///     .tag("writing")
///     .pricing(PricingTier::Freemium)
///     .build()
///     .unwrap();
/// assert_eq!(record.features.len(), 1);
///
/// assert!(ExtractedToolRecord::builder().name("Acme").build().is_err());
/// ```
#[derive(Debug, Default)]
pub struct ExtractedToolRecordBuilder {
    name: Option<String>,
    description: Option<String>,
    features: Vec<String>,
    use_cases: Vec<String>,
    pricing: Option<PricingTier>,
    tags: Vec<String>,
    logo_url: Option<String>,
}

impl ExtractedToolRecordBuilder {
    pub fn name(mut self, value: impl Into<String>) -> Self {
        self.name = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn feature(mut self, value: impl Into<String>) -> Self {
        self.features.push(value.into());
        self
    }

    pub fn features(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.features.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn use_case(mut self, value: impl Into<String>) -> Self {
        self.use_cases.push(value.into());
        self
    }

    pub fn use_cases(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.use_cases.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn tag(mut self, value: impl Into<String>) -> Self {
        self.tags.push(value.into());
        self
    }

    pub fn tags(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn pricing(mut self, value: PricingTier) -> Self {
        self.pricing = Some(value);
        self
    }

    pub fn logo_url(mut self, value: Option<String>) -> Self {
        self.logo_url = value;
        self
    }

    /// Builds the record.
    ///
    /// Text fields and list entries are trimmed and blank list entries dropped.
    ///
    /// # Errors
    ///
    /// [`ToolscoutError::IncompleteRecord`] naming the first required field
    /// that is missing or empty.
    pub fn build(self) -> Result<ExtractedToolRecord> {
        let name = required_text(self.name, "name")?;
        let description = required_text(self.description, "description")?;
        let features = required_list(self.features, "features")?;
        let use_cases = required_list(self.use_cases, "useCases")?;
        let tags = required_list(self.tags, "tags")?;
        let pricing = self.pricing.ok_or(ToolscoutError::IncompleteRecord { field: "pricing" })?;

        Ok(ExtractedToolRecord { name, description, features, use_cases, pricing, tags, logo_url: self.logo_url })
    }
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ToolscoutError::IncompleteRecord { field })
}

fn required_list(values: Vec<String>, field: &'static str) -> Result<Vec<String>> {
    let cleaned: Vec<String> = values.into_iter().map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).collect();
    if cleaned.is_empty() { Err(ToolscoutError::IncompleteRecord { field }) } else { Ok(cleaned) }
}
