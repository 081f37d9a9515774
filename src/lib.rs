//! Magnet Preview - a OneBot chat bot that previews magnet links.
//!
//! Messages containing BitTorrent magnet links or bare info-hashes are looked
//! up against a metadata service and answered with the torrent's name, size,
//! file count and optionally blurred screenshots.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;
/// Presentation layer containing the bot event loop.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "magnet-preview";
