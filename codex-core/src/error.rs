//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for Hex Codex
//!
//! Every fallible operation in the library returns `Result<T, AppError>`.
//! Variants carry enough context to be shown verbatim in the error overlay,
//! since load failures are surfaced to the user rather than swallowed.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all Hex Codex operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Reading a local CSV source failed.
    #[error("Failed to read data source {path:?}: {source}")]
    SourceIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Transport-level failure talking to the remote data source.
    #[error("Network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote data source answered with a non-success status.
    #[error("Data source {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The CSV text could not be read at all (header unreadable, etc.).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config file I/O error with path.
    #[error("Failed to access config file {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No home directory to derive the config location from.
    #[error("Could not determine config directory")]
    ConfigDirUnavailable,

    /// Input validation errors
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    /// Background task failure (panicked or aborted join).
    #[error("Task {task_id} failed: {reason}")]
    TaskFailed { task_id: u64, reason: String },

}

impl AppError {
    /// Create a network failure error
    pub fn network<S: Into<String>>(url: S, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Create an HTTP status error
    pub fn http_status<S: Into<String>>(url: S, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a local source read error
    pub fn source_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::SourceIo {
            path: path.into(),
            source,
        }
    }

    /// Create a config file access error
    pub fn config_io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::ConfigIo {
            path: path.into(),
            source,
        }
    }

    /// Create an input validation error
    pub fn invalid_input<S1: Into<String>, S2: Into<String>>(field: S1, message: S2) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a task failure error
    pub fn task_failed<S: Into<String>>(task_id: u64, reason: S) -> Self {
        Self::TaskFailed {
            task_id,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same load could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::HttpStatus { .. } | Self::SourceIo { .. }
        )
    }
}
