use serde::Deserialize;

/// Main configuration structure for Shelf-Ripple
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalogue and HTTP behaviour
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// First listing page of the catalogue
    #[serde(rename = "root-url", default = "default_root_url")]
    pub root_url: String,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON artifact written by persisted runs
    #[serde(rename = "artifact-path", default = "default_artifact_path")]
    pub artifact_path: String,
}

/// Daily schedule configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Local wall-clock time of the daily run, "HH:MM"
    #[serde(rename = "run-at", default = "default_run_at")]
    pub run_at: String,

    /// How often the scheduler checks whether the run is due (seconds)
    #[serde(rename = "poll-interval-secs", default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Optional file that receives a copy of every log line
    pub file: Option<String>,
}

fn default_root_url() -> String {
    "http://books.toscrape.com/".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_artifact_path() -> String {
    "artifacts/books_data.json".to_string()
}

fn default_run_at() -> String {
    "19:00".to_string()
}

fn default_poll_interval() -> u64 {
    60
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            artifact_path: default_artifact_path(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            run_at: default_run_at(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value, `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}
