//! Group whitelist checks.

use crate::domain::entities::IncomingMessage;

/// Decides which chats the bot answers in.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    group_whitelist: Vec<String>,
}

impl AccessPolicy {
    /// Creates a policy. An empty whitelist allows every group.
    #[must_use]
    pub fn new(group_whitelist: Vec<String>) -> Self {
        Self { group_whitelist }
    }

    /// Private chats are always allowed; groups must be whitelisted when a
    /// whitelist is configured.
    #[must_use]
    pub fn is_allowed(&self, message: &IncomingMessage) -> bool {
        let Some(group_id) = message.group_id.as_deref() else {
            return true;
        };

        self.group_whitelist.is_empty() || self.group_whitelist.iter().any(|g| g == group_id)
    }
}
