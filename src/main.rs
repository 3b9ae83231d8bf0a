//! qa-harvest main entry point
//!
//! This is the command-line interface for the marine-insurance knowledge-base
//! harvester.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qa_harvest::config::{load_config_with_hash, Config, ImportTarget};
use qa_harvest::output::StatusReport;
use qa_harvest::pipeline::{self, ExtractInput, Pipeline};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// qa-harvest: a marine-insurance knowledge-base harvester
///
/// Crawls marine-insurance websites, extracts question/answer pairs from the
/// scraped text, and imports them into a knowledge-base API in batches.
#[derive(Parser, Debug)]
#[command(name = "qa-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A marine-insurance knowledge-base harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "qa-harvest.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the config and show what would be crawled
    Check,

    /// Scrape the configured source pages
    Scrape,

    /// Deep crawl the configured domains
    Crawl,

    /// Extract Q&A pairs from a crawl or scrape artifact
    Extract {
        /// Artifact to read
        #[arg(long, value_enum, default_value_t = Input::Crawl)]
        from: Input,
    },

    /// Import the extracted Q&A pairs into the knowledge base
    Import,

    /// Run crawl, extract and import in sequence
    Run,

    /// Show the latest run statistics and recent log lines
    Status {
        /// Number of log lines to show
        #[arg(short = 'n', long, default_value_t = 10)]
        lines: usize,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Input {
    Crawl,
    Sources,
}

impl From<Input> for ExtractInput {
    fn from(input: Input) -> Self {
        match input {
            Input::Crawl => ExtractInput::Crawl,
            Input::Sources => ExtractInput::Sources,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    // Check and status only read; everything else is recorded in the run log
    let log_path = match cli.command {
        Command::Check | Command::Status { .. } => None,
        _ => Some(Path::new(&config.output.log_path)),
    };
    setup_logging(cli.verbose, cli.quiet, log_path)?;

    tracing::info!(
        "Configuration loaded from {} (hash: {})",
        cli.config.display(),
        config_hash
    );

    match cli.command {
        Command::Check => handle_check(&config),
        Command::Scrape => {
            let pages = pipeline::run_scrape(&config).await?;
            tracing::info!("Scraping complete: {} sources", pages.len());
            Ok(ExitCode::SUCCESS)
        }
        Command::Crawl => {
            let results = pipeline::run_crawl(&config).await?;
            let pages: usize = results.iter().map(|r| r.pages_scraped).sum();
            tracing::info!("TOTAL PAGES SCRAPED: {}", pages);
            Ok(ExitCode::SUCCESS)
        }
        Command::Extract { from } => {
            let pairs = pipeline::run_extract(&config, from.into())?;
            tracing::info!("TOTAL Q&A EXTRACTED: {}", pairs.len());
            Ok(ExitCode::SUCCESS)
        }
        Command::Import => {
            let target = resolve_target(&config)?;
            let summary = pipeline::run_import(&config, &target).await?;
            Ok(if summary.failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Run => {
            let target = resolve_target(&config)?;
            let stats = Pipeline::new(&config, &target).run().await;
            Ok(if stats.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Status { lines } => {
            let report = StatusReport::load(
                Path::new(&config.output.stats_path),
                Path::new(&config.output.log_path),
                lines,
            )?;
            report.print();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// When `log_path` is given, events are also appended to that file without
/// ANSI colouring.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&Path>) -> Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("qa_harvest=info,warn"),
            1 => EnvFilter::new("qa_harvest=debug,info"),
            2 => EnvFilter::new("qa_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Resolves the import credential once, before any stage runs
fn resolve_target(config: &Config) -> Result<ImportTarget> {
    ImportTarget::resolve(&config.import).context("Cannot import without a service credential")
}

/// Handles the `check` command: shows what the config would do
fn handle_check(config: &Config) -> Result<ExitCode> {
    println!("=== qa-harvest Configuration Check ===\n");

    println!("Crawler Configuration:");
    println!("  Discovery depth: {}", config.crawler.max_depth);
    println!("  Queue limit: {}", config.crawler.queue_limit);
    println!("  Max pages per domain: {}", config.crawler.max_pages);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Scrape delay: {}ms", config.crawler.scrape_delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!("  Crawl stage timeout: {}s", config.crawler.crawl_timeout_secs);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header);

    println!("\nOutput:");
    println!("  Crawl results: {}", config.output.crawl_path);
    println!("  Scraped pages: {}", config.output.scraped_path);
    println!("  Q&A pairs: {}", config.output.qa_path);
    println!("  CSV export: {}", config.output.csv_path);
    println!("  Stats: {}", config.output.stats_path);
    println!("  Log: {}", config.output.log_path);

    println!("\nImport:");
    println!("  Endpoint: {}", config.import.endpoint);
    println!(
        "  Credential: ${} sent as {}",
        config.import.api_key_env, config.import.api_key_header
    );
    println!("  Batch size: {}", config.import.batch_size);
    if config.import.dry_run {
        println!("  Dry run: entries are validated, not stored");
    }

    println!("\nDomains ({}):", config.domains.len());
    for entry in &config.domains {
        let max_pages = entry.max_pages.unwrap_or(config.crawler.max_pages);
        println!("  - {} from {} (up to {} pages)", entry.id, entry.seed, max_pages);
    }

    println!("\nSources ({}):", config.sources.len());
    for entry in &config.sources {
        println!("  - {}", entry.url);
    }

    println!("\n✓ Configuration is valid");
    Ok(ExitCode::SUCCESS)
}
