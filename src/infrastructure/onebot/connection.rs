use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Error as WsError;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, StatusCode, header};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};

use super::codec::{EventParser, Frame};
use super::constants::CONNECTION_TIMEOUT;
use super::error::{OneBotError, OneBotResult};
use super::payloads::ActionRequest;
use crate::domain::entities::AccessToken;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, WsMessage>;
type WsReader = SplitStream<WsStream>;

#[async_trait]
pub trait OneBotConnection: Send + Sync {
    async fn connect(&mut self, url: &str, token: Option<&AccessToken>) -> OneBotResult<()>;
    async fn disconnect(&mut self) -> OneBotResult<()>;
    async fn send(&mut self, request: &ActionRequest) -> OneBotResult<()>;
    async fn receive(&mut self) -> OneBotResult<Frame>;
}

/// Forward WebSocket connection to a OneBot v11 implementation.
pub struct WebSocketConnection {
    writer: Option<WsWriter>,
    reader: Option<WsReader>,
    connected: bool,
}

impl WebSocketConnection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            writer: None,
            reader: None,
            connected: false,
        }
    }

    fn map_handshake_error(error: WsError) -> OneBotError {
        match error {
            WsError::Http(response)
                if matches!(
                    response.status(),
                    StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
                ) =>
            {
                OneBotError::auth_failed(format!("endpoint returned {}", response.status()))
            }
            WsError::Url(e) => OneBotError::invalid_endpoint(e.to_string()),
            other => OneBotError::connection_failed(other.to_string()),
        }
    }

    fn decode(text: &str) -> Option<Frame> {
        match EventParser::parse_frame(text) {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!(error = %e, "Dropping undecodable frame");
                None
            }
        }
    }
}

impl Default for WebSocketConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OneBotConnection for WebSocketConnection {
    async fn connect(&mut self, url: &str, token: Option<&AccessToken>) -> OneBotResult<()> {
        let mut request = url
            .into_client_request()
            .map_err(|e| OneBotError::invalid_endpoint(e.to_string()))?;

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
                .map_err(|_| OneBotError::invalid_endpoint("access token is not a valid header value"))?;
            request.headers_mut().insert(header::AUTHORIZATION, value);
        }

        let (ws_stream, _) = timeout(CONNECTION_TIMEOUT, connect_async(request))
            .await
            .map_err(|_| OneBotError::timeout("connection"))?
            .map_err(Self::map_handshake_error)?;

        let (writer, reader) = ws_stream.split();
        self.writer = Some(writer);
        self.reader = Some(reader);
        self.connected = true;

        Ok(())
    }

    async fn disconnect(&mut self) -> OneBotResult<()> {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.close().await;
        }
        self.reader = None;
        self.connected = false;
        debug!("WebSocket connection closed");
        Ok(())
    }

    async fn send(&mut self, request: &ActionRequest) -> OneBotResult<()> {
        let writer = self.writer.as_mut().ok_or(OneBotError::NotConnected)?;

        let json = serde_json::to_string(request)
            .map_err(|e| OneBotError::serialization(e.to_string()))?;

        writer
            .send(WsMessage::Text(json.into()))
            .await
            .map_err(|e| OneBotError::websocket(e.to_string()))?;

        Ok(())
    }

    async fn receive(&mut self) -> OneBotResult<Frame> {
        let reader = self.reader.as_mut().ok_or(OneBotError::NotConnected)?;

        loop {
            match reader.next().await {
                Some(Ok(WsMessage::Text(text))) => {
                    if let Some(frame) = Self::decode(text.as_str()) {
                        return Ok(frame);
                    }
                }
                Some(Ok(WsMessage::Binary(data))) => {
                    if let Ok(text) = std::str::from_utf8(&data)
                        && let Some(frame) = Self::decode(text)
                    {
                        return Ok(frame);
                    }
                }
                Some(Ok(WsMessage::Close(frame))) => {
                    self.connected = false;
                    let (code, reason) = frame.map_or_else(
                        || (1000, "Normal closure".to_string()),
                        |f| (f.code.into(), f.reason.to_string()),
                    );

                    return Err(OneBotError::ConnectionClosed { code, reason });
                }
                Some(Ok(WsMessage::Ping(data))) => {
                    if let Some(writer) = self.writer.as_mut() {
                        let _ = writer.send(WsMessage::Pong(data)).await;
                    }
                }
                Some(Ok(WsMessage::Pong(_) | WsMessage::Frame(_))) => {}
                Some(Err(e)) => {
                    self.connected = false;
                    return Err(OneBotError::websocket(e.to_string()));
                }
                None => {
                    self.connected = false;
                    return Err(OneBotError::ConnectionClosed {
                        code: 1000,
                        reason: "Stream ended".to_string(),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_connection_initial_state() {
        let conn = WebSocketConnection::new();
        assert!(!conn.connected);
    }

    #[tokio::test]
    async fn test_send_without_connection() {
        let mut conn = WebSocketConnection::new();
        let request = ActionRequest::get_msg("1", "echo");
        assert!(matches!(
            conn.send(&request).await,
            Err(OneBotError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_is_fatal() {
        let mut conn = WebSocketConnection::new();
        let err = conn.connect("not a url", None).await.unwrap_err();
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_refused_connection_is_retryable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut conn = WebSocketConnection::new();
        let err = conn.connect(&format!("ws://{addr}"), None).await.unwrap_err();
        assert!(err.should_reconnect());
    }
}
