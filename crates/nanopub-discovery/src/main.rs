//! Nanopublication discovery - command-line entry point.
//!
//! Looks up nanopublications related to one bibliographic item and prints them.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nanopub_discovery::formatters::{format_nanopubs_json, format_nanopubs_markdown, format_report_json};
use nanopub_discovery::models::ResponseFormat;
use nanopub_discovery::{Config, Discovery, ItemRef};

#[derive(Parser, Debug)]
#[command(name = "nanopub-discovery")]
#[command(about = "Find nanopublications related to a paper")]
#[command(version)]
struct Cli {
    /// DOI of the item (resolver prefixes are accepted)
    #[arg(long)]
    doi: Option<String>,

    /// Title of the item
    #[arg(long)]
    title: Option<String>,

    /// Output format: markdown or json
    #[arg(long, default_value = "markdown")]
    format: OutputFormat,

    /// Include every endpoint call in JSON output
    #[arg(long)]
    report: bool,

    /// SPARQL endpoint, repeatable; replaces the defaults
    #[arg(long = "sparql-endpoint")]
    sparql_endpoints: Vec<String>,

    /// Legacy REST endpoint, repeatable; replaces the defaults
    #[arg(long = "legacy-endpoint")]
    legacy_endpoints: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "NANOPUB_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Identifier results below this count also trigger a title search
    #[arg(long, env = "NANOPUB_TITLE_THRESHOLD")]
    title_threshold: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable Markdown
    #[default]
    Markdown,
    /// Machine-readable JSON
    Json,
}

impl From<OutputFormat> for ResponseFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => Self::Markdown,
            OutputFormat::Json => Self::Json,
        }
    }
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays parseable.
    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr)).init();
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    // Validated once below, after the command-line overrides.
    let mut config = Config::new().apply_env()?;

    if !cli.sparql_endpoints.is_empty() {
        config = config.with_sparql_endpoints(&cli.sparql_endpoints[..]);
    }
    if !cli.legacy_endpoints.is_empty() {
        config = config.with_legacy_endpoints(&cli.legacy_endpoints[..]);
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout = Duration::from_secs(secs);
    }
    if let Some(threshold) = cli.title_threshold {
        config.title_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    if cli.doi.is_none() && cli.title.is_none() {
        anyhow::bail!("nothing to search for: pass --doi and/or --title");
    }

    let config = build_config(&cli)?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        primary = config.primary_endpoints.len(),
        legacy = config.legacy_endpoints.len(),
        "Starting nanopublication discovery"
    );

    let discovery = Discovery::new(&config)?;
    let item = ItemRef::new(cli.doi.clone(), cli.title.clone());
    let report = discovery.discover_with_report(&item).await;

    let output = match ResponseFormat::from(cli.format) {
        ResponseFormat::Json if cli.report => serde_json::to_string_pretty(&format_report_json(&report))?,
        ResponseFormat::Json => serde_json::to_string_pretty(&format_nanopubs_json(&report.results))?,
        ResponseFormat::Markdown => format_nanopubs_markdown(&report.results),
    };
    println!("{output}");

    Ok(())
}
