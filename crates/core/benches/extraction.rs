use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use time::OffsetDateTime;
use toolscout_core::preprocess::strip_boilerplate;
use toolscout_core::{
    FilterSpec, PreprocessConfig, PricingTier, SourceType, ToolCatalogEntry, filter_catalog, normalize,
};

fn landing_page(sections: usize) -> String {
    let mut html = String::from(
        r#"<html><head><title>Acme Writer</title><meta name="description" content="Drafts emails.">
        <link rel="icon" href="/favicon.ico"><script>window.analytics = {};</script></head>
        <body><header><nav><a href="/">Home</a><a href="/pricing">Pricing</a></nav></header><main>"#,
    );
    for i in 0..sections {
        html.push_str(&format!(
            "<section><h2>Feature {i}</h2><p>Acme drafts replies, summarizes threads and schedules follow-ups.</p></section>"
        ));
    }
    html.push_str("</main><footer>&copy; Acme</footer></body></html>");
    html
}

fn catalog(size: usize) -> Vec<ToolCatalogEntry> {
    (0..size)
        .map(|i| ToolCatalogEntry {
            id: i.to_string(),
            name: format!("Tool {i}"),
            logo_url: String::new(),
            short_description: if i % 3 == 0 { "Chat assistant".into() } else { "Image generator".into() },
            full_description: String::new(),
            website_url: format!("https://tool{i}.example"),
            screenshots: Vec::new(),
            features: Vec::new(),
            use_cases: Vec::new(),
            upvotes: (i * 7 % 101) as u32,
            categories: vec![if i % 2 == 0 { "writing".into() } else { "image".into() }],
            tags: vec!["ai".into()],
            pricing: PricingTier::ALL[i % 4],
            source: if i % 5 == 0 { SourceType::OpenSource } else { SourceType::ClosedSource },
            public_guide: None,
            comments: Vec::new(),
            submitted_by: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for sections in [10, 100, 1000] {
        let html = landing_page(sections);
        group.bench_with_input(BenchmarkId::new("sections", sections), &html, |b, html| {
            b.iter(|| normalize(black_box(html), "https://acme.ai"))
        });
    }

    group.finish();
}

fn bench_strip_boilerplate(c: &mut Criterion) {
    let html = landing_page(100);
    let config = PreprocessConfig::default();

    c.bench_function("strip_boilerplate", |b| b.iter(|| strip_boilerplate(black_box(&html), &config)));
}

fn bench_filter(c: &mut Criterion) {
    let entries = catalog(5000);
    let unconstrained = FilterSpec::default();
    let narrow = FilterSpec::builder()
        .search_term("chat")
        .category("writing")
        .pricing(PricingTier::Free)
        .pricing(PricingTier::Freemium)
        .build();

    let mut group = c.benchmark_group("filter_catalog");
    group.bench_function("unconstrained", |b| b.iter(|| filter_catalog(black_box(&entries), &unconstrained)));
    group.bench_function("narrow", |b| b.iter(|| filter_catalog(black_box(&entries), &narrow)));
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_strip_boilerplate, bench_filter);
criterion_main!(benches);
