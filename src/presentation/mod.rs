//! Presentation layer: the chat-facing event loop.

/// Bot event loop and message routing.
pub mod bot;

pub use bot::{MagnetBot, MessageRouter};
