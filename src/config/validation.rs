use crate::config::types::{
    Config, OutputConfig, ScheduleConfig, ScraperConfig, UserAgentConfig,
};
use crate::ConfigError;
use chrono::NaiveTime;
use url::Url;

/// Upper bound for the scheduler poll interval (one hour)
const MAX_POLL_INTERVAL_SECS: u64 = 3600;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_schedule_config(&config.schedule)?;
    Ok(())
}

/// Parses a "HH:MM" wall-clock time as used by `[schedule] run-at`
pub fn parse_run_at(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|e| {
        ConfigError::Validation(format!(
            "run_at must be a wall-clock time in HH:MM format, got '{}': {}",
            value, e
        ))
    })
}

fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.root_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid root_url '{}': {}", config.root_url, e))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "root_url '{}' must use http or https",
            config.root_url
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.artifact_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "artifact_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_schedule_config(config: &ScheduleConfig) -> Result<(), ConfigError> {
    parse_run_at(&config.run_at)?;

    if config.poll_interval_secs < 1 || config.poll_interval_secs > MAX_POLL_INTERVAL_SECS {
        return Err(ConfigError::Validation(format!(
            "poll_interval_secs must be between 1 and {}, got {}",
            MAX_POLL_INTERVAL_SECS, config.poll_interval_secs
        )));
    }

    Ok(())
}
