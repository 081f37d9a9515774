use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::FutureExt;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, trace, warn};

use super::codec::{EventParser, Frame, InboundEvent};
use super::connection::{OneBotConnection, WebSocketConnection};
use super::constants::{
    ACTION_TIMEOUT, MAX_RECONNECT_ATTEMPTS, OUTBOUND_BUFFER, RECONNECT_DELAY_BASE,
    RECONNECT_DELAY_MAX, RECONNECT_JITTER_MAX,
};
use super::error::{OneBotError, OneBotResult};
use super::events::OneBotEventKind;
use super::payloads::{ActionRequest, ActionResponse};
use super::state::ConnectionState;
use crate::domain::entities::{AccessToken, ChatTarget, MessageBody, Reply};
use crate::domain::errors::BotApiError;
use crate::domain::ports::BotApiPort;

/// Connection settings for [`OneBotClient`].
pub struct OneBotClientConfig {
    pub ws_url: String,
    pub access_token: Option<AccessToken>,
    pub auto_reconnect: bool,
    pub max_reconnect_attempts: u32,
    pub action_timeout: Duration,
}

impl OneBotClientConfig {
    #[must_use]
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            access_token: None,
            auto_reconnect: true,
            max_reconnect_attempts: MAX_RECONNECT_ATTEMPTS,
            action_timeout: ACTION_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_access_token(mut self, token: Option<AccessToken>) -> Self {
        self.access_token = token;
        self
    }

    #[must_use]
    pub const fn with_auto_reconnect(mut self, enabled: bool) -> Self {
        self.auto_reconnect = enabled;
        self
    }

    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    #[must_use]
    pub const fn with_action_timeout(mut self, action_timeout: Duration) -> Self {
        self.action_timeout = action_timeout;
        self
    }
}

type Connector = Arc<dyn Fn() -> Box<dyn OneBotConnection> + Send + Sync>;

/// State shared between the connection task and action callers.
#[derive(Default)]
struct Shared {
    pending: Mutex<HashMap<String, oneshot::Sender<ActionResponse>>>,
    outbound: Mutex<Option<mpsc::Sender<ActionRequest>>>,
    state: Mutex<ConnectionState>,
    shutdown: Notify,
}

impl Shared {
    fn set_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    fn complete(&self, response: ActionResponse) {
        let Some(echo) = response.echo.clone() else {
            trace!("Response without echo");
            return;
        };

        let waiter = self.pending.lock().remove(&echo);
        match waiter {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => debug!(echo = %echo, "Response for unknown or expired action"),
        }
    }

    fn fail_pending(&self) {
        let dropped = std::mem::take(&mut *self.pending.lock());
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "Dropping in-flight actions");
        }
    }
}

/// OneBot v11 client over a forward WebSocket.
///
/// Inbound events are delivered through the receiver returned by
/// [`connect`](Self::connect). Actions are issued through [`BotApiPort`] and
/// matched to their responses by a random `echo`.
pub struct OneBotClient {
    config: Arc<OneBotClientConfig>,
    shared: Arc<Shared>,
    running: Arc<AtomicBool>,
    connector: Connector,
}

impl OneBotClient {
    #[must_use]
    pub fn new(config: OneBotClientConfig) -> Self {
        Self::with_connector(config, Arc::new(|| Box::new(WebSocketConnection::new())))
    }

    #[must_use]
    fn with_connector(config: OneBotClientConfig, connector: Connector) -> Self {
        Self {
            config: Arc::new(config),
            shared: Arc::new(Shared::default()),
            running: Arc::new(AtomicBool::new(false)),
            connector,
        }
    }

    /// Starts the connection task.
    ///
    /// # Errors
    ///
    /// Returns `OneBotError::AlreadyConnected` if the task is already running.
    pub fn connect(&self) -> OneBotResult<mpsc::UnboundedReceiver<OneBotEventKind>> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(OneBotError::AlreadyConnected);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let config = self.config.clone();
        let shared = self.shared.clone();
        let running = self.running.clone();
        let connector = self.connector.clone();

        tokio::spawn(async move {
            let result = std::panic::AssertUnwindSafe(run_client_loop(
                config,
                connector,
                shared.clone(),
                event_tx.clone(),
                running.clone(),
            ));

            if let Err(panic_info) = result.catch_unwind().await {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };

                error!(panic = %panic_msg, "OneBot task panicked");
                running.store(false, Ordering::SeqCst);
                shared.set_state(ConnectionState::Disconnected);
                let _ = event_tx.send(OneBotEventKind::Error {
                    message: format!("OneBot task panicked: {panic_msg}"),
                    recoverable: false,
                });
            }
        });

        Ok(event_rx)
    }

    pub fn disconnect(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shared.set_state(ConnectionState::ShuttingDown);
        self.shared.shutdown.notify_waiters();
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.shared.state.lock()
    }

    fn next_echo() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    async fn call(&self, request: ActionRequest) -> Result<Value, BotApiError> {
        let action = request.action.clone();
        let echo = request.echo.clone();

        let sender = self
            .shared
            .outbound
            .lock()
            .clone()
            .ok_or(BotApiError::NotConnected)?;

        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().insert(echo.clone(), tx);

        if sender.send(request).await.is_err() {
            self.shared.pending.lock().remove(&echo);
            return Err(BotApiError::NotConnected);
        }

        trace!(action = %action, echo = %echo, "Action sent");

        let response = match timeout(self.config.action_timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(BotApiError::Closed { action }),
            Err(_) => {
                self.shared.pending.lock().remove(&echo);
                warn!(action = %action, "Action timed out");
                return Err(BotApiError::Timeout { action });
            }
        };

        if !response.is_ok() {
            return Err(BotApiError::action_failed(
                action,
                response.retcode,
                response.error_message(),
            ));
        }

        Ok(response.data)
    }
}

#[async_trait]
impl BotApiPort for OneBotClient {
    async fn get_msg(&self, message_id: &str) -> Result<MessageBody, BotApiError> {
        let data = self
            .call(ActionRequest::get_msg(message_id, Self::next_echo()))
            .await?;

        if !data.is_object() {
            return Err(BotApiError::unexpected("get_msg", "missing message data"));
        }

        Ok(EventParser::parse_message_body(&data))
    }

    async fn get_forward_msg(&self, forward_id: &str) -> Result<Vec<MessageBody>, BotApiError> {
        let data = self
            .call(ActionRequest::get_forward_msg(forward_id, Self::next_echo()))
            .await?;

        if data.is_null() {
            return Err(BotApiError::unexpected(
                "get_forward_msg",
                "missing forward data",
            ));
        }

        Ok(EventParser::parse_forward_nodes(&data))
    }

    async fn send_reply(&self, target: &ChatTarget, reply: &Reply) -> Result<(), BotApiError> {
        let request = match reply {
            Reply::Plain(text) => ActionRequest::send_text(target, text, Self::next_echo()),
            Reply::Forward(nodes) => ActionRequest::send_forward(target, nodes, Self::next_echo()),
        };

        self.call(request).await.map(|_| ())
    }
}

async fn run_client_loop(
    config: Arc<OneBotClientConfig>,
    connector: Connector,
    shared: Arc<Shared>,
    event_tx: mpsc::UnboundedSender<OneBotEventKind>,
    running: Arc<AtomicBool>,
) {
    let mut reconnect_attempts: u32 = 0;

    while running.load(Ordering::SeqCst) {
        shared.set_state(ConnectionState::Connecting);
        let mut connection = connector();

        match connection
            .connect(&config.ws_url, config.access_token.as_ref())
            .await
        {
            Ok(()) => {
                info!(url = %config.ws_url, "Connected to OneBot endpoint");
                reconnect_attempts = 0;

                let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_BUFFER);
                *shared.outbound.lock() = Some(outbound_tx);
                shared.set_state(ConnectionState::Connected);
                let _ = event_tx.send(OneBotEventKind::Connected);

                let result =
                    run_connection(connection.as_mut(), outbound_rx, &shared, &event_tx, &running)
                        .await;

                *shared.outbound.lock() = None;
                shared.fail_pending();
                let _ = connection.disconnect().await;

                if let Err(e) = result {
                    warn!(error = %e, "OneBot connection lost");
                    let _ = event_tx.send(OneBotEventKind::Disconnected {
                        reason: e.to_string(),
                    });

                    if !e.should_reconnect() {
                        break;
                    }
                    reconnect_attempts += 1;
                }
            }
            Err(e) => {
                error!(error = %e, "Failed to connect to OneBot endpoint");

                let _ = event_tx.send(OneBotEventKind::Error {
                    message: e.to_string(),
                    recoverable: e.should_reconnect(),
                });

                if !e.should_reconnect() {
                    break;
                }
                reconnect_attempts += 1;
            }
        }

        if !running.load(Ordering::SeqCst) {
            break;
        }

        if !config.auto_reconnect {
            let _ = event_tx.send(OneBotEventKind::Disconnected {
                reason: "Connection closed".to_string(),
            });
            break;
        }

        if reconnect_attempts >= config.max_reconnect_attempts {
            let e = OneBotError::ReconnectionLimitExceeded {
                attempts: reconnect_attempts,
            };
            error!(attempts = reconnect_attempts, "Max reconnection attempts exceeded");
            let _ = event_tx.send(OneBotEventKind::Error {
                message: e.to_string(),
                recoverable: false,
            });
            break;
        }

        let delay = calculate_backoff_delay(reconnect_attempts);
        info!(
            attempt = reconnect_attempts,
            delay_ms = delay.as_millis(),
            "Reconnecting to OneBot endpoint"
        );

        shared.set_state(ConnectionState::Reconnecting {
            attempt: reconnect_attempts,
        });
        let _ = event_tx.send(OneBotEventKind::Reconnecting {
            attempt: reconnect_attempts,
        });

        tokio::select! {
            () = sleep(delay) => {}
            () = shared.shutdown.notified() => break,
        }
    }

    running.store(false, Ordering::SeqCst);
    shared.set_state(ConnectionState::Disconnected);
    info!("OneBot client loop terminated");
}

async fn run_connection(
    connection: &mut dyn OneBotConnection,
    mut outbound_rx: mpsc::Receiver<ActionRequest>,
    shared: &Shared,
    event_tx: &mpsc::UnboundedSender<OneBotEventKind>,
    running: &AtomicBool,
) -> OneBotResult<()> {
    while running.load(Ordering::SeqCst) {
        tokio::select! {
            frame = connection.receive() => {
                handle_frame(frame?, shared, event_tx);
            }

            Some(request) = outbound_rx.recv() => {
                if let Err(e) = connection.send(&request).await {
                    shared.pending.lock().remove(&request.echo);
                    return Err(e);
                }
            }

            () = shared.shutdown.notified() => {
                debug!("Shutdown requested");
                return Ok(());
            }
        }
    }

    Ok(())
}

fn handle_frame(frame: Frame, shared: &Shared, event_tx: &mpsc::UnboundedSender<OneBotEventKind>) {
    match frame {
        Frame::Response(response) => shared.complete(response),
        Frame::Event(InboundEvent::Message(message)) => {
            trace!(message_id = %message.message_id, "Message event received");
            let _ = event_tx.send(OneBotEventKind::Message(message));
        }
        Frame::Event(InboundEvent::Lifecycle { self_id }) => {
            info!(self_id = ?self_id, "OneBot lifecycle connect");
        }
        Frame::Event(InboundEvent::Heartbeat) => trace!("OneBot heartbeat"),
        Frame::Event(InboundEvent::Ignored { post_type }) => {
            trace!(post_type = %post_type, "Ignoring event");
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn calculate_backoff_delay(attempt: u32) -> Duration {
    let base_delay = RECONNECT_DELAY_BASE.as_millis() as u64;
    let max_delay = RECONNECT_DELAY_MAX.as_millis() as u64;
    let jitter_max = RECONNECT_JITTER_MAX.as_millis() as u64;

    let exponential_delay = base_delay.saturating_mul(2_u64.saturating_pow(attempt.min(6)));
    let capped_delay = exponential_delay.min(max_delay);

    Duration::from_millis(capped_delay.saturating_add(rand_jitter(jitter_max)))
}

fn rand_jitter(max: u64) -> u64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::from(d.subsec_nanos()))
        .unwrap_or(0);

    nanos % max.max(1)
}
