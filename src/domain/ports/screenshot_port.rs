//! Screenshot retrieval and processing port definition.

use async_trait::async_trait;
use bytes::Bytes;

/// Port for fetching preview screenshots and obscuring them.
#[async_trait]
pub trait ScreenshotPort: Send + Sync {
    /// Downloads every URL, keeping input order and dropping failures.
    async fn download_all(&self, urls: &[String]) -> Vec<Bytes>;

    /// Blurs an image proportionally to `level`.
    /// Returns the input unchanged when it cannot be processed.
    async fn apply_mosaic(&self, data: Bytes, level: f32) -> Bytes;
}
