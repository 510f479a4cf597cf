//! Configuration module for Shelf-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All sections are optional, so `Config::default()` is a complete configuration
//! pointing at the public catalogue.
//!
//! # Example
//!
//! ```no_run
//! use shelf_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Scraping catalogue at: {}", config.scraper.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, LoggingConfig, OutputConfig, ScheduleConfig, ScraperConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{parse_run_at, validate};
