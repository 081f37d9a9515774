//! Chat message as seen by the bot.

/// Where a message was posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTarget {
    /// One-to-one chat with a user.
    Private {
        /// The other party.
        user_id: String,
    },
    /// Group chat.
    Group {
        /// Group identifier.
        group_id: String,
    },
}

/// A received message, reduced to what the preview flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Account the bot is logged in as.
    pub self_id: String,
    /// Message identifier.
    pub message_id: String,
    /// Sender account.
    pub user_id: String,
    /// Group the message was posted in, if any.
    pub group_id: Option<String>,
    /// Concatenated plain-text segments.
    pub text: String,
    /// Message this one replies to, if any.
    pub reply_id: Option<String>,
}

impl IncomingMessage {
    /// Returns the chat the reply should go to.
    #[must_use]
    pub fn target(&self) -> ChatTarget {
        self.group_id.as_ref().map_or_else(
            || ChatTarget::Private {
                user_id: self.user_id.clone(),
            },
            |group_id| ChatTarget::Group {
                group_id: group_id.clone(),
            },
        )
    }

    /// Returns true for private chats.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        self.group_id.is_none()
    }
}

/// One piece of a fetched message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// Plain text.
    Text(String),
    /// Reference to a merged-forward message.
    Forward {
        /// Forward message identifier.
        id: String,
    },
    /// Anything else (images, faces, mentions).
    Other,
}

/// Body of a message fetched back from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Structured segment list.
    Parts(Vec<MessagePart>),
    /// Unparsed message string.
    Raw(String),
}

impl MessageBody {
    /// Returns the text parts, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Raw(text) => vec![text.as_str()],
            Self::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    MessagePart::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::IncomingMessage;

    pub fn group_message(group_id: &str, text: &str) -> IncomingMessage {
        IncomingMessage {
            self_id: "10000".to_string(),
            message_id: "1".to_string(),
            user_id: "20000".to_string(),
            group_id: Some(group_id.to_string()),
            text: text.to_string(),
            reply_id: None,
        }
    }

    pub fn private_message(text: &str) -> IncomingMessage {
        IncomingMessage {
            self_id: "10000".to_string(),
            message_id: "1".to_string(),
            user_id: "20000".to_string(),
            group_id: None,
            text: text.to_string(),
            reply_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{group_message, private_message};
    use super::*;

    #[test]
    fn test_target_resolution() {
        assert_eq!(
            group_message("42", "hi").target(),
            ChatTarget::Group {
                group_id: "42".to_string()
            }
        );
        assert_eq!(
            private_message("hi").target(),
            ChatTarget::Private {
                user_id: "20000".to_string()
            }
        );
        assert!(private_message("hi").is_private());
    }

    #[test]
    fn test_body_texts() {
        let body = MessageBody::Parts(vec![
            MessagePart::Text("a".to_string()),
            MessagePart::Other,
            MessagePart::Forward { id: "f".to_string() },
            MessagePart::Text("b".to_string()),
        ]);
        assert_eq!(body.texts(), vec!["a", "b"]);
        assert_eq!(MessageBody::Raw("raw".to_string()).texts(), vec!["raw"]);
    }
}
