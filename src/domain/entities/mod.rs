//! Domain entity definitions.

mod link_info;
mod magnet;
mod message;
mod reply;
mod token;

pub use link_info::{FileType, LinkInfo};
pub use magnet::{InfoHash, MAGNET_PREFIX, MagnetLink};
#[cfg(test)]
pub(crate) use message::fixtures;
pub use message::{ChatTarget, IncomingMessage, MessageBody, MessagePart};
pub use reply::{ForwardNode, NodeContent, PreviewResult, Reply};
pub use token::AccessToken;
