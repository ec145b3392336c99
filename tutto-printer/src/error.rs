//! Error types for the printer library

use std::path::PathBuf;

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// Network connection error
    #[error("Connection failed: {0}")]
    Connection(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Staging artifact could not be written
    #[error("Staging failed in {dir}: {source}")]
    Staging {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// External print command could not be started
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// External print command exited with a failure status
    #[error("`{program}` exited with {}: {stderr}", exit_label(.code))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    /// Timeout waiting for printer
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Invalid printer configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// Primary path failed and the fallback failed too
    #[error("Delivery failed via {primary_path} ({primary}) and {fallback_path} ({fallback})")]
    Exhausted {
        primary_path: String,
        primary: Box<PrintError>,
        fallback_path: String,
        fallback: Box<PrintError>,
    },
}

impl PrintError {
    /// Whether the failure was caused by an expired wait
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Exhausted { fallback, .. } => fallback.is_timeout(),
            _ => false,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "signal".to_string(),
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
