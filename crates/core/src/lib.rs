pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fetch;
pub mod infer;
pub mod llm;
pub mod metadata;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod preprocess;
pub mod record;
pub mod suggest;

pub use catalog::{FilterSpec, FilterSpecBuilder, SourceType, ToolCatalogEntry, ToolComment, filter_catalog, load_catalog};
pub use config::{ExtractorConfig, ExtractorConfigBuilder};
pub use debounce::Debouncer;
pub use error::{FetchError, MANUAL_ENTRY_HINT, Result, ToolscoutError};
pub use fetch::{
    DirectFetcher, FetchStrategy, FetchedContent, LogoProbe, ReadabilityProxyFetcher, RenderingProxyFetcher, find_logo,
};
pub use infer::StructuredExtractor;
pub use llm::{ChatRequest, CompletionModel, Message, OpenAiClient};
pub use metadata::{PageMetadata, resolve_url};
pub use normalize::{NormalizeConfig, RawPageContent, normalize, normalize_with_config};
pub use parse::Document;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use pipeline::{AttemptTicket, AttemptTracker, Extractor, ExtractorBuilder};
pub use record::{ExtractedToolRecord, ExtractedToolRecordBuilder, PricingTier};
pub use suggest::{SearchSuggestion, SuggestionCache, SuggestionService, ToolCategory, basic_suggestion};
