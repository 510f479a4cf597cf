//! Output module for persisting scrape results
//!
//! This module handles:
//! - Writing the collected book records to the JSON artifact
//! - Reading an artifact back for inspection and tests

mod artifact;

pub use artifact::{read_artifact, write_artifact};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
