//! Search query analysis into catalog categories and keywords.
//!
//! [`SuggestionService`] asks a [`CompletionModel`] first and falls back to
//! [`basic_suggestion`], a keyword heuristic, on any failure. Results are kept
//! in a caller-owned [`SuggestionCache`].

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::infer::parse_reply;
use crate::llm::{ChatRequest, CompletionModel, Message};

const MAX_CATEGORIES: usize = 3;
const MAX_KEYWORDS: usize = 5;

pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Query words mapped to the catalog categories they usually mean.
const KEYWORD_CATEGORIES: &[(&str, &[&str])] = &[
    ("image", &["Image Gen", "Design"]),
    ("photo", &["Image Gen", "Design"]),
    ("picture", &["Image Gen", "Design"]),
    ("art", &["Image Gen", "Design"]),
    ("design", &["Design", "Image Gen"]),
    ("write", &["Text Gen", "Marketing"]),
    ("text", &["Text Gen", "Marketing"]),
    ("content", &["Text Gen", "Marketing"]),
    ("code", &["Code Assistant", "Productivity"]),
    ("programming", &["Code Assistant", "Productivity"]),
    ("chat", &["Chatbot"]),
    ("talk", &["Chatbot"]),
    ("conversation", &["Chatbot"]),
    ("video", &["Video AI", "Video Creation"]),
    ("music", &["Audio AI"]),
    ("audio", &["Audio AI"]),
    ("data", &["Analytics", "Research"]),
    ("analysis", &["Analytics", "Research"]),
    ("business", &["Business", "Productivity"]),
    ("productivity", &["Productivity"]),
    ("marketing", &["Marketing", "Text Gen"]),
    ("copy", &["Marketing", "Text Gen"]),
    ("copywriting", &["Marketing", "Text Gen"]),
    ("advertising", &["Marketing"]),
    ("ads", &["Marketing"]),
    ("campaign", &["Marketing"]),
    ("social", &["Marketing"]),
    ("email", &["Marketing", "Text Gen"]),
    ("seo", &["Marketing"]),
    ("blog", &["Marketing", "Text Gen"]),
    ("jasper", &["Marketing", "Text Gen"]),
    ("automation", &["Automation"]),
    ("nocode", &["No-Code"]),
    ("education", &["Education"]),
    ("research", &["Research"]),
    ("coding", &["Coding"]),
];

/// A catalog category as stored alongside the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl ToolCategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), description: String::new(), icon: None }
    }
}

/// Categories and keywords suggested for a search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
}

fn query_keywords(query: &str) -> Vec<String> {
    query.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Keyword heuristic used when no model answer is available.
///
/// A category matches when its name, or any word of it, appears in the query;
/// query words are then looked up in a fixed keyword map. Only known
/// categories are returned, deduplicated, at most 3, with at most 5 keywords.
pub fn basic_suggestion(query: &str, categories: &[ToolCategory]) -> SearchSuggestion {
    let lower = query.to_lowercase();
    let keywords = query_keywords(query);
    let mut matched: Vec<String> = Vec::new();

    for category in categories {
        let name = category.name.to_lowercase();
        if lower.contains(&name) || name.split_whitespace().any(|word| lower.contains(word)) {
            push_unique(&mut matched, &category.name);
        }
    }

    for keyword in &keywords {
        let Some((_, mapped)) = KEYWORD_CATEGORIES.iter().find(|(word, _)| word == keyword) else {
            continue;
        };
        for name in mapped.iter() {
            if categories.iter().any(|c| c.name == *name) {
                push_unique(&mut matched, name);
            }
        }
    }

    matched.truncate(MAX_CATEGORIES);
    SearchSuggestion { categories: matched, keywords: keywords.into_iter().take(MAX_KEYWORDS).collect() }
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

/// Bounded, expiring cache of suggestions keyed by normalized query.
///
/// When full, the oldest insertion is evicted.
#[derive(Debug)]
pub struct SuggestionCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<String, (Instant, SearchSuggestion)>,
    order: VecDeque<String>,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }
}

impl SuggestionCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self { capacity: capacity.max(1), ttl, entries: HashMap::new(), order: VecDeque::new() }
    }

    /// Cache key for `query`: trimmed and lowercased.
    pub fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }

    pub fn get(&mut self, query: &str) -> Option<SearchSuggestion> {
        let key = Self::key(query);
        let (stored_at, suggestion) = self.entries.get(&key)?;
        if stored_at.elapsed() < self.ttl {
            return Some(suggestion.clone());
        }

        self.entries.remove(&key);
        self.order.retain(|k| k != &key);
        None
    }

    pub fn insert(&mut self, query: &str, suggestion: SearchSuggestion) {
        let key = Self::key(query);
        if self.entries.contains_key(&key) {
            self.order.retain(|k| k != &key);
        }
        while self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            let Some(oldest) = self.order.pop_front() else { break };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, (Instant::now(), suggestion));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Suggests catalog categories and keywords for free-text queries.
#[derive(Clone)]
pub struct SuggestionService {
    model: Arc<dyn CompletionModel>,
}

impl SuggestionService {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Analyzes `query` against the known `categories`.
    ///
    /// Returns `None` for a blank query. Never fails: model errors and
    /// unusable replies fall back to [`basic_suggestion`].
    pub async fn suggest(
        &self, query: &str, categories: &[ToolCategory], cache: &mut SuggestionCache,
    ) -> Option<SearchSuggestion> {
        if query.trim().is_empty() {
            return None;
        }

        if let Some(hit) = cache.get(query) {
            debug!(query, "suggestion cache hit");
            return Some(hit);
        }

        let suggestion = match self.ask_model(query, categories).await {
            Some(suggestion) => suggestion,
            None => basic_suggestion(query, categories),
        };

        cache.insert(query, suggestion.clone());
        Some(suggestion)
    }

    async fn ask_model(&self, query: &str, categories: &[ToolCategory]) -> Option<SearchSuggestion> {
        let request = ChatRequest::new(self.model.model())
            .message(Message::user(suggestion_prompt(query, categories)))
            .temperature(0.3)
            .max_tokens(200);

        let reply = match self.model.complete(request).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "suggestion model failed, using keyword fallback");
                return None;
            }
        };

        let fields = match parse_reply(&reply) {
            Ok(fields) => fields,
            Err(e) => {
                warn!(error = %e, "suggestion reply unusable, using keyword fallback");
                return None;
            }
        };

        let mut known: Vec<String> = Vec::new();
        for name in string_list(fields.get("categories")).unwrap_or_default() {
            if categories.iter().any(|c| c.name == name) {
                push_unique(&mut known, &name);
            }
        }
        known.truncate(MAX_CATEGORIES);

        let mut keywords = string_list(fields.get("keywords")).unwrap_or_else(|| query_keywords(query));
        keywords.truncate(MAX_KEYWORDS);

        Some(SearchSuggestion { categories: known, keywords })
    }
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}

fn suggestion_prompt(query: &str, categories: &[ToolCategory]) -> String {
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    format!(
        "You are an AI assistant helping users find tools in an AI tool catalog. Analyze this search query and suggest relevant categories and keywords.\n\n\
         User query: \"{query}\"\n\n\
         Available categories: {names}\n\n\
         Provide a JSON response with:\n\
         1. \"categories\": An array of 1-3 most relevant category names from the available categories (exact matches only)\n\
         2. \"keywords\": An array of 3-5 relevant search keywords/terms to help find tools\n\n\
         Rules:\n\
         - Categories must be exact matches from the available list\n\
         - Keywords should be specific and related to the user's intent\n\
         - Focus on functionality, use cases, and tool types\n\
         - Return only valid JSON\n\n\
         Example:\n\
         {{\"categories\": [\"Image Generation\", \"Design\"], \"keywords\": [\"create\", \"images\", \"ai art\", \"graphics\", \"visual\"]}}",
        query = query,
        names = names.join(", "),
    )
}
