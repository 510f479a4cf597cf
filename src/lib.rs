//! Shelf-Ripple: a book catalogue scraper
//!
//! This crate walks the paginated catalogue of a public book store, extracts one
//! structured record per book detail page, optionally persists the collection to
//! a JSON artifact, and can repeat the whole run once per day.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;

use thiserror::Error;

/// Main error type for Shelf-Ripple operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Transport or HTTP status failure while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// The URL that could not be fetched
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Transport { url, .. } => url,
        }
    }

    /// The HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
        }
    }
}

/// A page is missing an element the site template always carries
#[derive(Debug, Error)]
#[error("HTML parse error for {url}: {message}")]
pub struct ParseError {
    pub url: String,
    pub message: String,
}

impl ParseError {
    pub fn new(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Shelf-Ripple operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scheduler, Scraper};
pub use model::BookRecord;

/// Scrapes the whole catalogue described by `config`
///
/// When `persist` is true the collection is written to the configured artifact
/// path, but only after every book has been scraped successfully.
pub async fn scrape_books(config: Config, persist: bool) -> Result<Vec<BookRecord>> {
    Scraper::new(config)?.scrape_books(persist).await
}

/// Fetches and parses a single book detail page
pub async fn get_book_data(config: Config, url: &str) -> Result<BookRecord> {
    Scraper::new(config)?.get_book_data(url).await
}
