//! OneBot v11 client over a forward WebSocket.

mod client;
mod codec;
mod connection;
mod constants;
mod error;
mod events;
mod payloads;
mod state;

pub use client::{OneBotClient, OneBotClientConfig};
pub use codec::{EventParser, Frame, InboundEvent};
pub use connection::{OneBotConnection, WebSocketConnection};
pub use constants::Action;
pub use error::{OneBotError, OneBotResult};
pub use events::OneBotEventKind;
pub use payloads::{ActionRequest, ActionResponse, Segment};
pub use state::ConnectionState;
