//! src/source/file_source.rs

use std::path::PathBuf;
use std::time::Instant;

use async_trait::async_trait;
use tracing::info;

use crate::error::AppError;
use crate::source::raw_source::RawSource;

/// Reads the spell table from a local CSV file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RawSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_raw(&self) -> Result<String, AppError> {
        let start = Instant::now();
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::source_io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            bytes = text.len(),
            "Read spell table in {:?}",
            start.elapsed()
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spells.csv");
        tokio::fs::write(&path, "Name,Level\nFireball,3\n")
            .await
            .unwrap();

        let text = FileSource::new(&path).fetch_raw().await.unwrap();
        assert_eq!(text, "Name,Level\nFireball,3\n");
    }

    #[tokio::test]
    async fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.csv");

        let err = FileSource::new(&path).fetch_raw().await.unwrap_err();
        assert!(matches!(err, AppError::SourceIo { .. }));
        assert!(err.to_string().contains("absent.csv"));
        assert!(err.is_retryable());
    }
}
