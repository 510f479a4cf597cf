//! Scrape coordinator - full-run orchestration
//!
//! This module drives a complete run:
//! - Walking the catalogue for book detail URLs
//! - Fetching and parsing every detail page, one request at a time
//! - Persisting the collection once the whole walk has succeeded
//!
//! A run is all-or-nothing. The first fetch or parse failure aborts it, nothing
//! is returned and nothing is written.

use crate::config::{validate, Config};
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::parse_book;
use crate::crawler::walker::CatalogueWalker;
use crate::model::BookRecord;
use crate::output::write_artifact;
use crate::ScraperError;
use reqwest::Client;
use std::path::Path;
use std::time::Instant;
use url::Url;

/// Books between two progress log lines
const PROGRESS_EVERY: usize = 100;

/// Scraper for one catalogue
pub struct Scraper {
    config: Config,
    client: Client,
    root_url: Url,
}

impl Scraper {
    /// Validates the configuration and builds the HTTP client
    pub fn new(config: Config) -> Result<Self, ScraperError> {
        validate(&config)?;
        let root_url = Url::parse(&config.scraper.root_url)?;
        let client = build_http_client(&config)?;

        Ok(Self {
            config,
            client,
            root_url,
        })
    }

    /// Fetches and parses a single book detail page
    pub async fn get_book_data(&self, url: &str) -> Result<BookRecord, ScraperError> {
        let url = Url::parse(url)?;
        self.fetch_book(&url).await
    }

    /// Scrapes every book in the catalogue, in catalogue order
    ///
    /// With `persist` set, the records are written to the configured artifact
    /// path after the last book has been parsed, replacing any earlier artifact.
    pub async fn scrape_books(&self, persist: bool) -> Result<Vec<BookRecord>, ScraperError> {
        tracing::info!("Starting catalogue scrape at {}", self.root_url);
        let start_time = Instant::now();

        let mut walker = CatalogueWalker::new(&self.client, self.root_url.clone());
        let mut books = Vec::new();

        while let Some(url) = walker.next_url().await {
            let url = url?;
            let book = self.fetch_book(&url).await?;
            books.push(book);

            if books.len() % PROGRESS_EVERY == 0 {
                let rate = books.len() as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} books scraped from {} pages, {:.2} books/sec",
                    books.len(),
                    walker.pages_visited(),
                    rate
                );
            }
        }

        tracing::info!(
            "Scraped {} books from {} catalogue pages in {:?}",
            books.len(),
            walker.pages_visited(),
            start_time.elapsed()
        );

        if persist {
            let path = Path::new(&self.config.output.artifact_path);
            write_artifact(path, &books)?;
            tracing::info!("Saved {} books to {}", books.len(), path.display());
        }

        Ok(books)
    }

    async fn fetch_book(&self, url: &Url) -> Result<BookRecord, ScraperError> {
        let html = fetch_page(&self.client, url).await?;
        Ok(parse_book(&html, url.as_str())?)
    }
}
