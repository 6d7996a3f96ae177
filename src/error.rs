//! Error types for the lanelog CLI.
//!
//! Parsing and diffing never fail; everything here comes from the outer
//! layer: configuration, file I/O and the network collaborators.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaneError {
    /// Bad argument combination or missing required value.
    #[error("{0}")]
    Usage(String),

    /// Configuration file could not be read or parsed.
    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// A log, report or output file could not be read or written.
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file exists but does not hold a valid snapshot.
    #[error("Invalid report file {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The webhook rejected the post or could not be reached.
    #[error("Webhook post failed: {0}")]
    Webhook(String),

    /// The pull request for the reported branch could not be resolved.
    #[error("Pull request lookup failed: {0}")]
    PullRequest(String),
}

impl LaneError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LaneError::Io { path: path.into(), source }
    }

    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaneError::Usage(_) | LaneError::Config { .. } => exit_codes::USER_ERROR,
            LaneError::Io { .. } | LaneError::Report { .. } => exit_codes::IO_FAILURE,
            LaneError::Webhook(_) => exit_codes::WEBHOOK_FAILURE,
            LaneError::PullRequest(_) => exit_codes::LOOKUP_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, LaneError>;
