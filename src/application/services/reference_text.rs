//! Text extraction from quoted messages.

use tracing::{debug, warn};

use crate::domain::entities::{MessageBody, MessagePart};
use crate::domain::errors::BotApiError;
use crate::domain::ports::BotApiPort;

/// Resolves the text of a message the user replied to, expanding merged
/// forwards one level deep.
pub struct ReferenceTextResolver<'a> {
    api: &'a dyn BotApiPort,
}

impl<'a> ReferenceTextResolver<'a> {
    /// Creates a resolver over the platform API.
    #[must_use]
    pub const fn new(api: &'a dyn BotApiPort) -> Self {
        Self { api }
    }

    /// Returns the referenced text, or `None` when the message could not be
    /// fetched.
    pub async fn resolve(&self, reply_id: &str) -> Option<String> {
        match self.collect(reply_id).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(reply_id, error = %e, "Failed to fetch referenced message");
                None
            }
        }
    }

    async fn collect(&self, reply_id: &str) -> Result<String, BotApiError> {
        let body = self.api.get_msg(reply_id).await?;

        let parts = match body {
            MessageBody::Raw(text) => return Ok(text),
            MessageBody::Parts(parts) => parts,
        };

        let mut text = String::new();
        for part in parts {
            match part {
                MessagePart::Text(segment) => {
                    text.push_str(&segment);
                    text.push(' ');
                }
                MessagePart::Forward { id } => {
                    let forwarded = self.forward_texts(&id).await;
                    text.push_str(&forwarded.join(" "));
                    text.push(' ');
                }
                MessagePart::Other => {}
            }
        }

        Ok(text)
    }

    async fn forward_texts(&self, forward_id: &str) -> Vec<String> {
        match self.api.get_forward_msg(forward_id).await {
            Ok(nodes) => {
                debug!(forward_id, nodes = nodes.len(), "Expanded forward message");
                nodes
                    .iter()
                    .flat_map(|node| node.texts().into_iter().map(str::to_owned))
                    .collect()
            }
            Err(e) => {
                warn!(forward_id, error = %e, "Failed to extract forward message");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::MockBotApi;

    #[tokio::test]
    async fn test_raw_message_text() {
        let api = MockBotApi::new().with_message("1", MessageBody::Raw("raw text".to_string()));
        let text = ReferenceTextResolver::new(&api).resolve("1").await;
        assert_eq!(text.as_deref(), Some("raw text"));
    }

    #[tokio::test]
    async fn test_segments_are_space_joined() {
        let api = MockBotApi::new().with_message(
            "1",
            MessageBody::Parts(vec![
                MessagePart::Text("first".to_string()),
                MessagePart::Other,
                MessagePart::Text("second".to_string()),
            ]),
        );
        let text = ReferenceTextResolver::new(&api).resolve("1").await;
        assert_eq!(text.as_deref(), Some("first second "));
    }

    #[tokio::test]
    async fn test_forward_is_expanded() {
        let api = MockBotApi::new()
            .with_message(
                "1",
                MessageBody::Parts(vec![
                    MessagePart::Text("intro".to_string()),
                    MessagePart::Forward {
                        id: "fw".to_string(),
                    },
                ]),
            )
            .with_forward(
                "fw",
                vec![
                    MessageBody::Parts(vec![MessagePart::Text("a".to_string())]),
                    MessageBody::Raw("b".to_string()),
                ],
            );
        let text = ReferenceTextResolver::new(&api).resolve("1").await;
        assert_eq!(text.as_deref(), Some("intro a b "));
    }

    #[tokio::test]
    async fn test_missing_forward_is_skipped() {
        let api = MockBotApi::new().with_message(
            "1",
            MessageBody::Parts(vec![MessagePart::Forward {
                id: "gone".to_string(),
            }]),
        );
        let text = ReferenceTextResolver::new(&api).resolve("1").await;
        assert_eq!(text.as_deref(), Some(" "));
    }

    #[tokio::test]
    async fn test_missing_message_yields_none() {
        let api = MockBotApi::new();
        assert!(ReferenceTextResolver::new(&api).resolve("404").await.is_none());
    }
}
