//! Link lookup port definition.

use async_trait::async_trait;

use crate::domain::entities::{LinkInfo, MagnetLink};
use crate::domain::errors::LookupError;

/// Port for resolving a magnet link into torrent metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkLookupPort: Send + Sync {
    /// Fetches metadata for the link.
    async fn lookup(&self, link: &MagnetLink) -> Result<LinkInfo, LookupError>;
}
