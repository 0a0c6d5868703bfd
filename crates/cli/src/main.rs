use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use toolscout_core::{
    ExtractedToolRecord, Extractor, ExtractorConfig, ExtractorConfigBuilder, FilterSpec, LogoProbe, OpenAiClient,
    PricingTier, SourceType, SuggestionCache, SuggestionService, ToolCatalogEntry, ToolCategory, ToolscoutError,
    filter_catalog, load_catalog,
};
use tracing_subscriber::EnvFilter;

mod echo;

use echo::{
    print_banner, print_error, print_info, print_record_details, print_step, print_success, print_timing,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit code when every fetch strategy failed and the record must be entered by hand
const EXIT_MANUAL_ENTRY: i32 = 2;

/// Output format for records and catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" | "txt" => Ok(Self::Text),
            _ => Err(format!("Invalid format: {}. Valid options: json, text", s)),
        }
    }
}

/// Auto-fill AI tool records from their websites and search a tool catalog
#[derive(Parser, Debug)]
#[command(name = "toolscout")]
#[command(author = "Toolscout Contributors")]
#[command(version)]
#[command(about = "Auto-fill AI tool records from their websites", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract a structured tool record from a website
    Extract(ExtractArgs),

    /// Find a site logo by probing conventional paths
    Logo {
        /// Website URL
        #[arg(value_name = "URL")]
        url: String,

        /// HTTP timeout in seconds for each probe
        #[arg(long, default_value = "30", value_name = "SECS")]
        timeout: u64,
    },

    /// Search and filter a catalog snapshot
    Filter(FilterArgs),

    /// Suggest catalog categories and keywords for a search query
    Suggest {
        /// Free-text search query
        #[arg(value_name = "QUERY")]
        query: String,

        /// Categories JSON file (array of {id, name, description})
        #[arg(long, value_name = "FILE")]
        categories: PathBuf,
    },

    /// Generate a shell completion script
    Completions {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Website URL of the tool
    #[arg(value_name = "URL")]
    url: String,

    /// Output format (json, text)
    #[arg(short, long, default_value = "json", value_name = "FORMAT")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// HTTP timeout in seconds for each fetch attempt
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Chat-completion model (overrides TOOLSCOUT_MODEL)
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Do not probe conventional logo paths when the page has no logo
    #[arg(long)]
    skip_logo_probe: bool,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Catalog JSON file (array of tool entries)
    #[arg(value_name = "CATALOG")]
    catalog: PathBuf,

    /// Case-insensitive text matched against name, short description and tags
    #[arg(short, long, value_name = "TERM")]
    search: Option<String>,

    /// Category id to include (repeatable)
    #[arg(short, long = "category", value_name = "ID")]
    categories: Vec<String>,

    /// Pricing tier to include: free, freemium, paid, contact-us (repeatable)
    #[arg(short, long = "pricing", value_name = "TIER")]
    pricing: Vec<PricingTier>,

    /// Source type to include: open-source, closed-source (repeatable)
    #[arg(long = "source", value_name = "SOURCE")]
    sources: Vec<SourceType>,

    /// Output format (json, text)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,
}

impl FilterArgs {
    fn spec(&self) -> FilterSpec {
        FilterSpec::builder()
            .search_term(self.search.clone().unwrap_or_default())
            .categories(self.categories.iter().cloned())
            .pricing_tiers(self.pricing.iter().copied())
            .sources(self.sources.iter().copied())
            .build()
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

fn write_output(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => println!("{}", output),
    }
    Ok(())
}

fn render_record(record: &ExtractedToolRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => record.to_json().context("Failed to serialize record"),
        OutputFormat::Text => Ok(record.to_text()),
    }
}

fn render_catalog(entries: &[ToolCatalogEntry], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(entries).context("Failed to serialize catalog"),
        OutputFormat::Text => Ok(entries
            .iter()
            .map(|e| format!("{} ({} upvotes) [{}, {}] {}", e.name, e.upvotes, e.pricing, e.source, e.short_description))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

async fn run_extract(args: ExtractArgs, verbose: bool) -> anyhow::Result<()> {
    let mut builder =
        ExtractorConfigBuilder::from_config(ExtractorConfig::from_env()).fetch_timeout(Duration::from_secs(args.timeout));
    if let Some(model) = args.model {
        builder = builder.model(model);
    }
    let config = builder.build();

    if verbose {
        print_step(1, 3, &format!("Extracting {}", args.url.bright_white().underline()));
        eprintln!("  {} {}", "Model:".dimmed(), config.model.bright_white());
        if config.openai_api_key.is_none() {
            print_warning("OPENAI_API_KEY is not set; the model stage will fail");
        }
        if config.scrapingbee_api_key.is_none() {
            print_info("SCRAPINGBEE_API_KEY is not set; skipping straight past the rendering proxy");
        }
    }

    let extractor = Extractor::from_config(&config).context("Failed to set up extractor")?;
    let started = Instant::now();

    let mut record = match extractor.extract(&args.url).await {
        Ok(record) => record,
        Err(err @ ToolscoutError::ExtractionFailed { .. }) => {
            print_error(&err.to_string());
            print_info("Open the tool form and enter the name, description, features, use cases, pricing and tags by hand.");
            std::process::exit(EXIT_MANUAL_ENTRY);
        }
        Err(err) => return Err(err).with_context(|| format!("Failed to extract {}", args.url)),
    };

    if verbose {
        print_timing("Extraction", started.elapsed());
    }

    if record.logo_url.is_none() && !args.skip_logo_probe {
        if verbose {
            print_step(2, 3, "Probing conventional logo paths");
        }
        let probe = LogoProbe::new(&config).context("Failed to set up logo probe")?;
        match probe.find_logo(&args.url).await {
            Ok(logo) => record.logo_url = logo,
            Err(e) => print_warning(&format!("Logo probe failed: {}", e)),
        }
    }

    if verbose {
        print_record_details(&record);
        print_step(3, 3, "Writing output");
    }

    write_output(&render_record(&record, args.format)?, args.output.as_deref())
}

async fn run_logo(url: &str, timeout: u64) -> anyhow::Result<()> {
    let config = ExtractorConfig::builder().fetch_timeout(Duration::from_secs(timeout)).build();
    let probe = LogoProbe::new(&config).context("Failed to set up logo probe")?;

    match probe.find_logo(url).await.with_context(|| format!("Failed to probe {}", url))? {
        Some(logo) => println!("{}", logo),
        None => print_warning(&format!("No logo found at the conventional paths of {}", url)),
    }
    Ok(())
}

fn run_filter(args: &FilterArgs) -> anyhow::Result<()> {
    let json =
        fs::read_to_string(&args.catalog).with_context(|| format!("Failed to read file: {}", args.catalog.display()))?;
    let entries = load_catalog(&json).with_context(|| format!("Failed to load catalog: {}", args.catalog.display()))?;

    let shown = filter_catalog(&entries, &args.spec());
    print_info(&format!("{} of {} tools match", shown.len(), entries.len()));
    write_output(&render_catalog(&shown, args.format)?, None)
}

async fn run_suggest(query: &str, categories_path: &Path) -> anyhow::Result<()> {
    let json = fs::read_to_string(categories_path)
        .with_context(|| format!("Failed to read file: {}", categories_path.display()))?;
    let categories: Vec<ToolCategory> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid categories JSON: {}", categories_path.display()))?;

    let model = OpenAiClient::new(&ExtractorConfig::from_env()).context("Failed to set up completion client")?;
    if !model.has_credentials() {
        print_info("OPENAI_API_KEY is not set; using keyword matching");
    }

    let service = SuggestionService::new(Arc::new(model));
    let mut cache = SuggestionCache::default();

    match service.suggest(query, &categories, &mut cache).await {
        Some(suggestion) => {
            let output = serde_json::to_string_pretty(&suggestion).context("Failed to serialize suggestion")?;
            write_output(&output, None)
        }
        None => {
            print_warning("Empty query, nothing to suggest");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    match cli.command {
        Command::Extract(args) => run_extract(args, cli.verbose).await,
        Command::Logo { url, timeout } => run_logo(&url, timeout).await,
        Command::Filter(args) => run_filter(&args),
        Command::Suggest { query, categories } => run_suggest(&query, &categories).await,
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "toolscout", &mut io::stdout());
            Ok(())
        }
    }
}
