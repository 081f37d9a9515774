//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Screenshot download and blurring.
pub mod image;
/// OneBot v11 WebSocket client.
pub mod onebot;
/// Link lookup service client.
pub mod whatslink;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use image::ScreenshotDownloader;
pub use onebot::{OneBotClient, OneBotClientConfig, OneBotError, OneBotEventKind};
pub use whatslink::WhatslinkClient;
