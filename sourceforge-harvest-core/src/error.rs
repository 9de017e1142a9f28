//! Error types for the SourceForge harvesting pipeline.
//!
//! Only [`FetchError`] ever crosses the pipeline boundary. [`ListingError`]
//! is caught by the orchestrator and turned into a logged, recoverable
//! event; clone failures never become errors at all (see
//! [`crate::contract::ReplicationOutcome`]).

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn an account name into a list of projects.
#[derive(Error, Debug)]
pub enum ListingError {
    /// Timeout, DNS failure, refused connection, interrupted body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to fetch repositories: HTTP {status}")]
    RemoteListing { status: u16 },

    #[error("malformed project listing: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The only fatal condition of a fetch run.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Failed to create directory '{}': {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejected connection parameters.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required parameter '{0}'")]
    MissingKey(&'static str),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
