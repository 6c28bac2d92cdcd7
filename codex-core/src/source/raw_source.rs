//! src/source/raw_source.rs
//! ============================================================================
//! # Data Source Adapter
//!
//! One call, no parameters, raw CSV text back. The concrete source is picked
//! from the configured location string.

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;

use crate::config::SourceConfig;
use crate::error::AppError;
use crate::source::{file_source::FileSource, http_source::HttpSource};

/// Anything that can hand back the raw spell table text.
#[async_trait]
pub trait RawSource: Send + Sync {
    /// Human-readable location, for logs and the status bar.
    fn describe(&self) -> String;

    /// Retrieve the full raw text. No retry is attempted here.
    async fn fetch_raw(&self) -> Result<String, AppError>;
}

/// Parsed form of the configured location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Remote(String),
    Local(PathBuf),
}

impl SourceLocation {
    /// `http://` / `https://` are remote; everything else is a path,
    /// with an optional `file://` prefix.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::invalid_input(
                "source.location",
                "location must not be empty",
            ));
        }

        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Remote(raw.to_string()))
        } else if let Some(path) = raw.strip_prefix("file://") {
            Ok(Self::Local(PathBuf::from(path)))
        } else {
            Ok(Self::Local(PathBuf::from(raw)))
        }
    }
}

/// Build the source described by the config.
pub fn from_config(config: &SourceConfig) -> Result<Arc<dyn RawSource>, AppError> {
    let source: Arc<dyn RawSource> = match SourceLocation::parse(&config.location)? {
        SourceLocation::Remote(url) => Arc::new(HttpSource::new(url, config.timeout)?),
        SourceLocation::Local(path) => Arc::new(FileSource::new(path)),
    };
    Ok(source)
}
