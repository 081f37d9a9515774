//! Concurrent screenshot downloads.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::future::join_all;
use reqwest::Client;
use tracing::{debug, warn};

use crate::domain::errors::LookupError;
use crate::domain::ports::ScreenshotPort;

use super::mosaic;

/// Fetches screenshots over HTTP and blurs them on request.
#[derive(Debug, Clone)]
pub struct ScreenshotDownloader {
    http_client: Client,
}

impl ScreenshotDownloader {
    /// Creates a downloader whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(timeout: Duration) -> Result<Self, LookupError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http_client })
    }

    async fn download(&self, url: &str) -> Option<Bytes> {
        let response = match self.http_client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "Screenshot request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                url,
                status = %response.status(),
                "Screenshot download returned an error status"
            );
            return None;
        }

        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                warn!(url, "Screenshot download returned an empty body");
                None
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to read screenshot body");
                None
            }
        }
    }
}

#[async_trait]
impl ScreenshotPort for ScreenshotDownloader {
    async fn download_all(&self, urls: &[String]) -> Vec<Bytes> {
        if urls.is_empty() {
            return Vec::new();
        }

        let results = join_all(urls.iter().map(|url| self.download(url))).await;
        let images: Vec<Bytes> = results.into_iter().flatten().collect();

        debug!(
            requested = urls.len(),
            downloaded = images.len(),
            "Screenshot downloads finished"
        );
        images
    }

    async fn apply_mosaic(&self, data: Bytes, level: f32) -> Bytes {
        mosaic::apply_mosaic(data, level).await
    }
}
