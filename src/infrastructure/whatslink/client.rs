//! HTTP client for the whatslink metadata API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, error};

use crate::domain::entities::{LinkInfo, MagnetLink};
use crate::domain::errors::LookupError;
use crate::domain::ports::LinkLookupPort;

/// API path appended to the configured base URL.
pub const LOOKUP_PATH: &str = "/api/v1/link";
const USER_AGENT: &str = "Mozilla/5.0 (MagnetPreviewer)";

/// Resolves magnet links through the whatslink API.
#[derive(Debug, Clone)]
pub struct WhatslinkClient {
    client: Client,
    endpoint: String,
}

impl WhatslinkClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LookupError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| LookupError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}{LOOKUP_PATH}", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl LinkLookupPort for WhatslinkClient {
    async fn lookup(&self, link: &MagnetLink) -> Result<LinkInfo, LookupError> {
        let uri = link.uri();
        debug!(hash = %link.hash(), "Looking up magnet link");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", uri.as_str())])
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Lookup request failed");
                if e.is_timeout() {
                    LookupError::Timeout
                } else {
                    LookupError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Lookup service returned an error status");
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let info: LinkInfo = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse lookup response");
            LookupError::decode(e.to_string())
        })?;

        debug!(
            hash = %link.hash(),
            name = info.name.as_deref().unwrap_or_default(),
            error = info.is_error(),
            "Lookup finished"
        );

        Ok(info)
    }
}
