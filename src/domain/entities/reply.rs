//! Outgoing replies.

use bytes::Bytes;

/// Formatted outcome of one link lookup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewResult {
    /// Info lines, shown joined by newlines.
    pub lines: Vec<String>,
    /// Screenshot URLs to show or download.
    pub screenshot_urls: Vec<String>,
}

impl PreviewResult {
    /// Creates a result with no screenshots.
    #[must_use]
    pub fn text_only(lines: Vec<String>) -> Self {
        Self {
            lines,
            screenshot_urls: Vec::new(),
        }
    }
}

/// Content of one merged-forward node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    /// Plain text.
    Text(String),
    /// Encoded image.
    Image(Bytes),
}

/// One node of a merged-forward message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardNode {
    /// Account shown as the node author.
    pub sender_id: String,
    /// Display name of the node.
    pub name: String,
    /// Node payload.
    pub content: NodeContent,
}

impl ForwardNode {
    /// Creates a text node.
    #[must_use]
    pub fn text(sender_id: impl Into<String>, name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            name: name.into(),
            content: NodeContent::Text(text.into()),
        }
    }

    /// Creates an image node.
    #[must_use]
    pub fn image(sender_id: impl Into<String>, name: impl Into<String>, data: Bytes) -> Self {
        Self {
            sender_id: sender_id.into(),
            name: name.into(),
            content: NodeContent::Image(data),
        }
    }
}

/// Reply produced by a use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Single plain-text message.
    Plain(String),
    /// Merged-forward message made of several nodes.
    Forward(Vec<ForwardNode>),
}

impl Reply {
    /// Creates a plain reply.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Returns the text of a plain reply.
    #[must_use]
    pub fn as_plain(&self) -> Option<&str> {
        match self {
            Self::Plain(text) => Some(text),
            Self::Forward(_) => None,
        }
    }

    /// Returns the nodes of a forward reply.
    #[must_use]
    pub fn nodes(&self) -> &[ForwardNode] {
        match self {
            Self::Plain(_) => &[],
            Self::Forward(nodes) => nodes,
        }
    }
}
