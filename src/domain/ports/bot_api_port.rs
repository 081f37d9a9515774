//! Chat platform port definition.

use async_trait::async_trait;

use crate::domain::entities::{ChatTarget, MessageBody, Reply};
use crate::domain::errors::BotApiError;

/// Port for the chat platform calls the bot depends on.
#[async_trait]
pub trait BotApiPort: Send + Sync {
    /// Fetches a message by ID.
    async fn get_msg(&self, message_id: &str) -> Result<MessageBody, BotApiError>;

    /// Fetches the node bodies of a merged-forward message.
    async fn get_forward_msg(&self, forward_id: &str) -> Result<Vec<MessageBody>, BotApiError>;

    /// Sends a reply into a chat.
    async fn send_reply(&self, target: &ChatTarget, reply: &Reply) -> Result<(), BotApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::HashMap;

    /// In-memory chat platform.
    #[derive(Default)]
    pub struct MockBotApi {
        messages: HashMap<String, MessageBody>,
        forwards: HashMap<String, Vec<MessageBody>>,
        sent: Mutex<Vec<(ChatTarget, Reply)>>,
    }

    impl MockBotApi {
        /// Creates an empty platform.
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a message retrievable through `get_msg`.
        pub fn with_message(mut self, id: &str, body: MessageBody) -> Self {
            self.messages.insert(id.to_string(), body);
            self
        }

        /// Registers a merged-forward message.
        pub fn with_forward(mut self, id: &str, nodes: Vec<MessageBody>) -> Self {
            self.forwards.insert(id.to_string(), nodes);
            self
        }

        /// Returns every reply sent so far.
        pub fn sent(&self) -> Vec<(ChatTarget, Reply)> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl BotApiPort for MockBotApi {
        async fn get_msg(&self, message_id: &str) -> Result<MessageBody, BotApiError> {
            self.messages
                .get(message_id)
                .cloned()
                .ok_or_else(|| BotApiError::action_failed("get_msg", 100, "message not found"))
        }

        async fn get_forward_msg(&self, forward_id: &str) -> Result<Vec<MessageBody>, BotApiError> {
            self.forwards.get(forward_id).cloned().ok_or_else(|| {
                BotApiError::action_failed("get_forward_msg", 100, "forward not found")
            })
        }

        async fn send_reply(&self, target: &ChatTarget, reply: &Reply) -> Result<(), BotApiError> {
            self.sent.lock().push((target.clone(), reply.clone()));
            Ok(())
        }
    }
}
