use crate::domain::entities::IncomingMessage;

/// Events the client hands to the bot.
#[derive(Debug, Clone)]
pub enum OneBotEventKind {
    Connected,
    Disconnected { reason: String },
    Reconnecting { attempt: u32 },
    Message(IncomingMessage),
    Error { message: String, recoverable: bool },
}
