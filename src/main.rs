//! Shelf-Ripple main entry point
//!
//! This is the command-line interface for the Shelf-Ripple catalogue scraper.

use anyhow::Context;
use clap::Parser;
use shelf_ripple::config::{load_config_with_hash, Config};
use shelf_ripple::{run_scheduler, Scraper};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

/// Shelf-Ripple: a book catalogue scraper
///
/// With no mode flag, scrapes the whole catalogue once, saves the records to
/// the configured artifact and exits.
#[derive(Parser, Debug)]
#[command(name = "shelf-ripple")]
#[command(version)]
#[command(about = "A book catalogue scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a persisted scrape every day at the configured time, forever
    #[arg(long, conflicts_with = "book")]
    schedule: bool,

    /// Scrape a single book detail page and print it as JSON
    #[arg(long, value_name = "URL")]
    book: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    setup_logging(cli.verbose, cli.quiet, config.logging.file.as_deref())?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("No configuration file given, using defaults"),
    }

    if cli.schedule {
        tracing::info!("Press Ctrl+C to stop the scheduler.");
        run_scheduler(config).await.context("Scheduler failed")?;
    } else if let Some(url) = cli.book {
        handle_book(config, &url).await?;
    } else {
        handle_scrape(config).await?;
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
///
/// When a log file is configured every event goes to stderr and to the file.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&str>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_ripple=info,warn"),
            1 => EnvFilter::new("shelf_ripple=debug,info"),
            2 => EnvFilter::new("shelf_ripple=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            builder
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }

    Ok(())
}

/// Handles the default mode: one full scrape with persistence
async fn handle_scrape(config: Config) -> anyhow::Result<()> {
    let artifact_path = config.output.artifact_path.clone();
    tracing::info!("Starting full catalogue scrape at {}", config.scraper.root_url);
    tracing::info!("Results will be saved to {}", artifact_path);

    let scraper = Scraper::new(config)?;
    match scraper.scrape_books(true).await {
        Ok(books) => {
            tracing::info!("Scraping completed successfully!");
            tracing::info!("Total books scraped: {}", books.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scraping failed: {}", e);
            Err(e).context("Catalogue scrape failed")
        }
    }
}

/// Handles --book: prints a single record as JSON on stdout
async fn handle_book(config: Config, url: &str) -> anyhow::Result<()> {
    let scraper = Scraper::new(config)?;
    let book = scraper
        .get_book_data(url)
        .await
        .with_context(|| format!("Failed to scrape book at {}", url))?;

    println!("{}", serde_json::to_string_pretty(&book)?);
    Ok(())
}
