//! Automatic preview of links found in ordinary messages.

use tracing::trace;

use crate::application::dto::{PreviewSettings, starts_with_command};
use crate::application::services::{AccessPolicy, MagnetExtractor};
use crate::domain::entities::{IncomingMessage, Reply};

use super::PreviewUseCase;

/// Previews links posted without an explicit command.
#[derive(Clone)]
pub struct AutoParseUseCase {
    preview: PreviewUseCase,
    policy: AccessPolicy,
    enabled: bool,
    max_magnet_count: usize,
}

impl AutoParseUseCase {
    /// Creates new auto-parse use case.
    #[must_use]
    pub fn new(preview: PreviewUseCase, settings: &PreviewSettings) -> Self {
        Self {
            preview,
            policy: AccessPolicy::new(settings.group_whitelist.clone()),
            enabled: settings.auto_parse,
            max_magnet_count: settings.max_magnet_count,
        }
    }

    /// Returns true when the message should reach [`Self::execute`].
    #[must_use]
    pub fn matches(message: &IncomingMessage) -> bool {
        MagnetExtractor::contains_candidate(&message.text)
    }

    /// Runs the preview. Returns `None` when skipped.
    pub async fn execute(&self, message: &IncomingMessage) -> Option<Reply> {
        if !self.enabled || !self.policy.is_allowed(message) {
            return None;
        }

        if starts_with_command(&message.text) {
            trace!("Command message left to the command handler");
            return None;
        }

        let links: Vec<_> = MagnetExtractor::extract_all(&message.text)
            .into_iter()
            .take(self.max_magnet_count)
            .collect();

        if links.is_empty() {
            return None;
        }

        self.preview.execute(message, &links).await
    }
}
