//! Structured-data extraction from normalized page content.
//!
//! The [`StructuredExtractor`] prompts a [`CompletionModel`] for a fixed JSON
//! shape and turns the reply into a complete [`ExtractedToolRecord`], filling
//! placeholders for anything the model left out.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::llm::{ChatRequest, CompletionModel, Message, strip_code_fence};
use crate::metadata::resolve_url;
use crate::normalize::RawPageContent;
use crate::record::{DEFAULT_DESCRIPTION, DEFAULT_FEATURE, DEFAULT_NAME, DEFAULT_TAG, DEFAULT_USE_CASE};
use crate::{ExtractedToolRecord, PricingTier, Result, ToolscoutError};

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

const RESPONSE_SHAPE: &str = r#"REQUIRED FORMAT (return exactly this structure):
{
  "name": "Product name from title/heading",
  "description": "Clear 2-3 sentence description of what this product/service does",
  "features": ["main feature 1", "main feature 2", "main feature 3"],
  "useCases": ["who would use this", "what problem it solves"],
  "pricing": "Free" | "Freemium" | "Paid" | "Contact Us",
  "tags": ["category", "type", "relevant keywords"]
}"#;

const INSTRUCTIONS: &str = "INSTRUCTIONS:
- Extract the actual product name from the title or main heading
- Write a clear description of what the product does
- List 3-5 main features or capabilities
- Identify 2-3 use cases or target audiences
- Determine pricing model from content (look for pricing, subscription, free trial mentions)
- Add 3-5 relevant tags for categorization
- If information is limited, make reasonable inferences based on context";

/// Turns [`RawPageContent`] into an [`ExtractedToolRecord`] with a text-generation model.
#[derive(Clone)]
pub struct StructuredExtractor {
    model: Arc<dyn CompletionModel>,
}

impl StructuredExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Infers a record from `page`.
    pub async fn infer(&self, page: &RawPageContent) -> Result<ExtractedToolRecord> {
        self.infer_via(page, None).await
    }

    /// Infers a record from `page`, naming the fetch method in the prompt.
    ///
    /// # Errors
    ///
    /// - [`ToolscoutError::ModelUnavailable`] without model credentials
    /// - [`ToolscoutError::EmptyResponse`] for a blank reply
    /// - [`ToolscoutError::MalformedResponse`] when the reply is not a JSON object
    pub async fn infer_via(&self, page: &RawPageContent, method: Option<&str>) -> Result<ExtractedToolRecord> {
        let request = ChatRequest::new(self.model.model())
            .message(Message::user(build_prompt(page, method)))
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        let reply = self.model.complete(request).await?;
        debug!(chars = reply.len(), "model reply received");

        let fields = parse_reply(&reply).inspect_err(|e| warn!(error = %e, "model reply rejected"))?;
        record_from_reply(fields, page)
    }
}

/// Builds the extraction prompt for `page`.
pub fn build_prompt(page: &RawPageContent, method: Option<&str>) -> String {
    let heading = match method {
        Some(method) => format!("WEBSITE DATA (extracted via {}):", method),
        None => "WEBSITE DATA:".to_string(),
    };

    format!(
        "You are a product data extraction expert. Extract key information from this website content and return ONLY a valid JSON object.\n\n\
         {shape}\n\n\
         {instructions}\n\n\
         {heading}\n\
         Title: {title}\n\
         Meta Description: {description}\n\
         Content: {content}\n\
         URL: {url}\n\n\
         Extract real information from the content above. Return ONLY the JSON object, no additional text.",
        shape = RESPONSE_SHAPE,
        instructions = INSTRUCTIONS,
        heading = heading,
        title = page.title,
        description = page.meta_description,
        content = page.body_text,
        url = page.source_url,
    )
}

/// Parses a model reply into its top-level JSON object.
///
/// A surrounding markdown code fence is tolerated; anything else around the
/// object is not.
pub fn parse_reply(reply: &str) -> Result<Map<String, Value>> {
    let body = strip_code_fence(reply);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(ToolscoutError::MalformedResponse(format!("expected a JSON object, got {}", kind(&other)))),
        Err(e) => Err(ToolscoutError::MalformedResponse(e.to_string())),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn record_from_reply(fields: Map<String, Value>, page: &RawPageContent) -> Result<ExtractedToolRecord> {
    let name = text_field(&fields, "name")
        .or_else(|| non_empty(&page.title))
        .unwrap_or_else(|| DEFAULT_NAME.to_string());
    let description = text_field(&fields, "description")
        .or_else(|| non_empty(&page.meta_description))
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

    let pricing = text_field(&fields, "pricing")
        .and_then(|p| PricingTier::infer(&p))
        .unwrap_or(PricingTier::ContactUs);

    let logo_url = page
        .logo_url
        .clone()
        .or_else(|| text_field(&fields, "logoUrl"))
        .and_then(|logo| resolve_url(&logo, Some(&page.source_url)));

    ExtractedToolRecord::builder()
        .name(name)
        .description(description)
        .features(list_field(&fields, "features").unwrap_or_else(|| vec![DEFAULT_FEATURE.to_string()]))
        .use_cases(list_field(&fields, "useCases").unwrap_or_else(|| vec![DEFAULT_USE_CASE.to_string()]))
        .tags(list_field(&fields, "tags").unwrap_or_else(|| vec![DEFAULT_TAG.to_string()]))
        .pricing(pricing)
        .logo_url(logo_url)
        .build()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).and_then(non_empty)
}

/// Reads a list of strings; a lone string counts as a one-item list.
fn list_field(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items: Vec<String> = match fields.get(key)? {
        Value::Array(values) => values.iter().filter_map(Value::as_str).filter_map(non_empty).collect(),
        Value::String(value) => non_empty(value).into_iter().collect(),
        _ => Vec::new(),
    };
    if items.is_empty() { None } else { Some(items) }
}
