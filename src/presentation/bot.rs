//! Bot event loop.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::application::dto::MagnetCommand;
use crate::application::use_cases::{AutoParseUseCase, MagnetCommandUseCase};
use crate::domain::entities::{IncomingMessage, Reply};
use crate::domain::ports::BotApiPort;
use crate::infrastructure::onebot::{OneBotClient, OneBotError, OneBotEventKind};

/// Picks the use case for a message.
#[derive(Clone)]
pub struct MessageRouter {
    command: MagnetCommandUseCase,
    auto_parse: AutoParseUseCase,
}

impl MessageRouter {
    /// Creates new router.
    #[must_use]
    pub const fn new(command: MagnetCommandUseCase, auto_parse: AutoParseUseCase) -> Self {
        Self {
            command,
            auto_parse,
        }
    }

    /// Returns the reply for `message`, if any.
    pub async fn route(&self, message: &IncomingMessage) -> Option<Reply> {
        if !message.self_id.is_empty() && message.user_id == message.self_id {
            return None;
        }

        if let Some(command) = MagnetCommand::parse(&message.text) {
            debug!(message_id = %message.message_id, "Handling magnet command");
            return self.command.execute(message, &command).await;
        }

        if AutoParseUseCase::matches(message) {
            debug!(message_id = %message.message_id, "Auto-parsing message");
            return self.auto_parse.execute(message).await;
        }

        None
    }

    /// Routes `message` and sends the reply back to its chat.
    pub async fn dispatch(&self, api: &dyn BotApiPort, message: IncomingMessage) {
        let Some(reply) = self.route(&message).await else {
            return;
        };

        if let Err(e) = api.send_reply(&message.target(), &reply).await {
            warn!(
                error = %e,
                message_id = %message.message_id,
                "Failed to send preview reply"
            );
        }
    }
}

/// Magnet preview bot bound to a OneBot connection.
pub struct MagnetBot {
    client: Arc<OneBotClient>,
    router: MessageRouter,
}

impl MagnetBot {
    /// Creates new bot.
    #[must_use]
    pub const fn new(client: Arc<OneBotClient>, router: MessageRouter) -> Self {
        Self { client, router }
    }

    /// Runs until Ctrl-C or until the connection gives up.
    ///
    /// # Errors
    ///
    /// Returns `OneBotError::AlreadyConnected` if the client is already running.
    pub async fn run(self) -> Result<(), OneBotError> {
        let mut events = self.client.connect()?;

        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.handle_event(event);
                }
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!(error = %e, "Failed to listen for Ctrl-C");
                    }
                    break;
                }
            }
        }

        self.client.disconnect();
        info!(state = %self.client.state(), "magnet preview bot terminated");
        Ok(())
    }

    fn handle_event(&self, event: OneBotEventKind) {
        match event {
            OneBotEventKind::Message(message) => {
                let router = self.router.clone();
                let api: Arc<dyn BotApiPort> = self.client.clone();
                tokio::spawn(async move {
                    router.dispatch(api.as_ref(), message).await;
                });
            }
            OneBotEventKind::Connected => info!("Bot online"),
            OneBotEventKind::Disconnected { reason } => {
                warn!(reason = %reason, state = %self.client.state(), "Bot offline");
            }
            OneBotEventKind::Reconnecting { attempt } => {
                info!(attempt, "Waiting to reconnect");
            }
            OneBotEventKind::Error {
                message,
                recoverable,
            } => {
                if recoverable {
                    warn!(error = %message, "Connection error");
                } else {
                    error!(error = %message, "Connection error, giving up");
                }
            }
        }
    }
}
