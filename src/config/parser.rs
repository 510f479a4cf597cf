use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates a TOML configuration file
///
/// Sections missing from the file fall back to their defaults, so an empty file
/// yields the same configuration as `Config::default()`.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use shelf_ripple::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Artifact: {}", config.output.artifact_path);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    tracing::debug!("Reading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes the hex-encoded SHA-256 of a configuration file
///
/// The binary logs this at startup so scheduled runs can be traced back to the
/// exact configuration they were started with.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&content)))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
