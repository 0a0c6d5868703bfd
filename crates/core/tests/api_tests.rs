//! Library API integration tests
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;
use toolscout_core::*;
use url::Url;

struct CountingStrategy {
    name: &'static str,
    outcome: std::result::Result<FetchedContent, FetchError>,
    calls: Arc<AtomicUsize>,
}

impl CountingStrategy {
    fn new(name: &'static str, outcome: std::result::Result<FetchedContent, FetchError>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Self { name, outcome, calls: calls.clone() }, calls)
    }
}

#[async_trait]
impl FetchStrategy for CountingStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _url: &Url) -> std::result::Result<FetchedContent, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

/// Replies with a record named after whatever title appears in the prompt.
struct TitleEchoModel {
    prompts: Mutex<Vec<String>>,
}

impl TitleEchoModel {
    fn new() -> Arc<Self> {
        Arc::new(Self { prompts: Mutex::new(Vec::new()) })
    }
}

#[async_trait]
impl CompletionModel for TitleEchoModel {
    fn model(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let prompt = request.messages[0].content.clone();
        let title = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Title: "))
            .unwrap_or_default()
            .to_string();
        self.prompts.lock().unwrap().push(prompt);
        Ok(json!({ "name": title, "features": ["Drafts"], "pricing": "Paid" }).to_string())
    }
}

fn page(title: &str, body: &str) -> FetchedContent {
    FetchedContent::Html(format!(
        "<html><head><title>{}</title></head><body><main><p>{}</p></main></body></html>",
        title, body
    ))
}

fn assert_complete(record: &ExtractedToolRecord) {
    assert!(!record.name.trim().is_empty());
    assert!(!record.description.trim().is_empty());
    assert!(!record.features.is_empty());
    assert!(!record.use_cases.is_empty());
    assert!(!record.tags.is_empty());
}

#[tokio::test]
async fn test_first_success_short_circuits() {
    let (first, first_calls) = CountingStrategy::new("render", Ok(page("Rendered", "From the renderer")));
    let (second, second_calls) = CountingStrategy::new("readability", Ok(page("Readable", "unused")));
    let (third, third_calls) = CountingStrategy::new("direct", Ok(page("Direct", "unused")));

    let extractor = Extractor::builder()
        .strategy(first)
        .strategy(second)
        .strategy(third)
        .model(TitleEchoModel::new())
        .build()
        .unwrap();

    let record = extractor.extract("https://acme.ai").await.unwrap();
    assert_complete(&record);
    assert_eq!(record.name, "Rendered");
    assert_eq!(
        [first_calls.load(Ordering::SeqCst), second_calls.load(Ordering::SeqCst), third_calls.load(Ordering::SeqCst)],
        [1, 0, 0]
    );
}

#[tokio::test]
async fn test_auth_failure_falls_through_to_second_strategy() {
    let (first, _) = CountingStrategy::new("render", Err(FetchError::Auth("missing API key".into())));
    let (second, second_calls) = CountingStrategy::new(
        "readability",
        Ok(FetchedContent::Readable {
            title: "Second Source".into(),
            excerpt: "From readability".into(),
            text: "Readable body".into(),
        }),
    );
    let (third, third_calls) = CountingStrategy::new("direct", Ok(page("Third", "unused")));
    let model = TitleEchoModel::new();

    let extractor = Extractor::builder()
        .strategy(first)
        .strategy(second)
        .strategy(third)
        .model(model.clone())
        .build()
        .unwrap();

    let record = extractor.extract("https://acme.ai").await.unwrap();
    assert_eq!(record.name, "Second Source");
    assert_eq!(record.description, "From readability");
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(third_calls.load(Ordering::SeqCst), 0);

    let prompts = model.prompts.lock().unwrap();
    assert!(prompts[0].contains("Content: Readable body"));
}

#[tokio::test]
async fn test_all_failures_report_last_reason() {
    let (first, _) = CountingStrategy::new("render", Err(FetchError::Auth("missing API key".into())));
    let (second, _) = CountingStrategy::new("readability", Err(FetchError::Upstream { status: 502 }));
    let (third, _) = CountingStrategy::new("direct", Err(FetchError::Http { status: 404 }));
    let model = TitleEchoModel::new();

    let extractor = Extractor::builder()
        .strategy(first)
        .strategy(second)
        .strategy(third)
        .model(model.clone())
        .build()
        .unwrap();

    let err = extractor.extract("https://acme.ai").await.unwrap_err();
    assert!(matches!(err, ToolscoutError::ExtractionFailed { .. }));

    let message = err.to_string();
    assert!(message.contains("direct"));
    assert!(message.contains(&FetchError::Http { status: 404 }.to_string()));
    assert!(message.contains(MANUAL_ENTRY_HINT));
    assert!(model.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_url_makes_no_calls() {
    let (only, calls) = CountingStrategy::new("direct", Ok(page("Acme", "body")));
    let extractor = Extractor::builder().strategy(only).model(TitleEchoModel::new()).build().unwrap();

    for url in ["not a url", "ftp://acme.ai/file", "mailto:team@acme.ai", ""] {
        let err = extractor.extract(url).await.unwrap_err();
        assert!(matches!(err, ToolscoutError::InvalidInput(_)), "{} gave {:?}", url, err);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_reply_is_not_an_empty_record() {
    struct ProseModel;

    #[async_trait]
    impl CompletionModel for ProseModel {
        fn model(&self) -> &str {
            "prose"
        }

        async fn complete(&self, _request: ChatRequest) -> Result<String> {
            Ok("Sure! Here is the data: {\"name\": \"Acme\",}".to_string())
        }
    }

    let (only, _) = CountingStrategy::new("direct", Ok(page("Acme", "body")));
    let extractor = Extractor::builder().strategy(only).model(Arc::new(ProseModel)).build().unwrap();
    let err = extractor.extract("https://acme.ai").await.unwrap_err();
    assert!(matches!(err, ToolscoutError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_end_to_end_with_direct_fetch_and_http_model() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/tool");
            then.status(200).body(
                r#"<html><head><title>Acme Writer</title>
                <meta name="description" content="Drafts emails for you.">
                <link rel="icon" href="/img/logo.png"></head>
                <body><nav>Home Pricing</nav><main><h1>Acme Writer</h1><p>Write better emails, faster.</p></main></body></html>"#,
            );
        })
        .await;
    let completion = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions").body_contains("Write better emails");
            then.status(200).json_body(json!({
                "choices": [{ "message": { "content": "```json\n{\"name\":\"Acme Writer\",\"description\":\"Email drafting assistant.\",\"features\":[\"Drafts\"],\"useCases\":[\"Sales teams\"],\"pricing\":\"Freemium\",\"tags\":[\"writing\"]}\n```" } }]
            }));
        })
        .await;

    let config = ExtractorConfig::builder().openai_api_key("sk-test").llm_base_url(server.url("/v1")).build();
    let extractor = Extractor::builder()
        .strategy(DirectFetcher::new(&config).unwrap())
        .model(Arc::new(OpenAiClient::new(&config).unwrap()))
        .build()
        .unwrap();

    let record = extractor.extract(&server.url("/tool")).await.unwrap();
    completion.assert_async().await;
    assert_eq!(record.pricing, PricingTier::Freemium);
    assert_eq!(record.logo_url, Some(server.url("/img/logo.png")));
    assert_complete(&record);
}

#[test]
fn test_relative_logo_resolution() {
    let base = Url::parse("https://example.com/page").unwrap();
    assert_eq!(resolve_url("/img/logo.png", Some(&base)).as_deref(), Some("https://example.com/img/logo.png"));
}

#[test]
fn test_normalize_page_metadata() {
    let html = r#"<html><head><title>Acme</title><meta property="og:image" content="/og.png"></head>
        <body><header>Top</header><main>Makes widgets.</main><footer>Bottom</footer></body></html>"#;
    let page = normalize(html, "https://example.com/page").unwrap();
    assert_eq!(page.title, "Acme");
    assert_eq!(page.body_text, "Makes widgets.");
    assert_eq!(page.logo_url.as_deref(), Some("https://example.com/og.png"));
}

fn catalog() -> Vec<ToolCatalogEntry> {
    load_catalog(
        r#"[
        {"id":"A","name":"Alpha Writer","logoUrl":"","shortDescription":"Writes copy","fullDescription":"",
         "websiteUrl":"https://a.example","upvotes":5,"categories":["writing"],"tags":["copy"],
         "pricing":"Free","source":"Open Source","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
        {"id":"B","name":"ChatGPT","logoUrl":"","shortDescription":"Chat assistant","fullDescription":"",
         "websiteUrl":"https://b.example","upvotes":5,"categories":["chat"],"tags":["llm"],
         "pricing":"Freemium","source":"Closed Source","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"},
        {"id":"C","name":"Canvas","logoUrl":"","shortDescription":"Image generation","fullDescription":"",
         "websiteUrl":"https://c.example","upvotes":9,"categories":["image"],"tags":["art"],
         "pricing":"Paid","source":"Closed Source","createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z"}
    ]"#,
    )
    .unwrap()
}

#[test]
fn test_empty_filter_sorts_by_upvotes_stably() {
    let shown = filter_catalog(&catalog(), &FilterSpec::default());
    let ids: Vec<&str> = shown.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["C", "A", "B"]);
}

#[test]
fn test_filter_idempotent_and_case_insensitive() {
    let entries = catalog();
    for term in ["chatgpt", "CHAT"] {
        let spec = FilterSpec::builder().search_term(term).build();
        let once = filter_catalog(&entries, &spec);
        assert_eq!(once.len(), 1);
        assert_eq!(once[0].name, "ChatGPT");
        assert_eq!(filter_catalog(&once, &spec), once);
    }
}

#[test]
fn test_attempt_tracker_guards_form_buffer() {
    let mut tracker = AttemptTracker::new();
    let mut form: Option<String> = None;

    let slow = tracker.begin();
    let fast = tracker.begin();
    assert!(tracker.commit(fast, "second url".to_string(), &mut form));
    assert!(!tracker.commit(slow, "first url".to_string(), &mut form));
    assert_eq!(form.as_deref(), Some("second url"));
}
