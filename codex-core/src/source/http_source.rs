//! src/source/http_source.rs

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::AppError;
use crate::source::raw_source::RawSource;

/// Fetches the spell table with a single GET.
#[derive(Debug, Clone)]
pub struct HttpSource {
    url: String,
    client: Client,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let url = url.into();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hex-codex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::network(&url, e))?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl RawSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_raw(&self) -> Result<String, AppError> {
        let start = Instant::now();
        debug!(url = %self.url, "Fetching spell table");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::network(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_status(&self.url, status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::network(&self.url, e))?;

        info!(
            url = %self.url,
            bytes = text.len(),
            "Fetched spell table in {:?}",
            start.elapsed()
        );
        Ok(text)
    }
}
