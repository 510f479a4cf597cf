//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests returning the page body as text
//! - Classifying failures into HTTP status and transport errors
//!
//! No retries happen here. A failed request is reported to the caller, which
//! aborts the current run.

use crate::config::Config;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use shelf_ripple::config::Config;
/// use shelf_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.scraper.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.scraper.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and returns its body
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | body text |
/// | 4xx / 5xx | `FetchError::Status` |
/// | DNS, connect, timeout, body read failure | `FetchError::Transport` |
pub async fn fetch_page(client: &Client, url: &Url) -> Result<String, FetchError> {
    tracing::debug!("GET {}", url);

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("{} returned HTTP {}", url, status.as_u16());
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| FetchError::Transport {
        url: url.to_string(),
        source,
    })
}
