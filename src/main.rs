use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use magnet_preview::application::{AutoParseUseCase, MagnetCommandUseCase, PreviewUseCase};
use magnet_preview::infrastructure::{
    AppConfig, CliArgs, OneBotClient, OneBotClientConfig, ScreenshotDownloader, StorageManager,
    WhatslinkClient,
};
use magnet_preview::presentation::{MagnetBot, MessageRouter};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.log_path.as_ref() {
        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_bot(config: &AppConfig) -> Result<MagnetBot> {
    let settings = config.preview_settings();
    let http_timeout = Duration::from_secs(config.whatslink.timeout_secs);

    let lookup = Arc::new(WhatslinkClient::new(&config.whatslink.base_url, http_timeout)?);
    let screenshots = Arc::new(ScreenshotDownloader::new(http_timeout)?);

    let client = Arc::new(OneBotClient::new(
        OneBotClientConfig::new(config.onebot.ws_url.clone())
            .with_access_token(config.onebot.token())
            .with_auto_reconnect(config.onebot.auto_reconnect)
            .with_max_reconnect_attempts(config.onebot.max_reconnect_attempts),
    ));

    let preview = PreviewUseCase::new(lookup, screenshots, &settings);
    let router = MessageRouter::new(
        MagnetCommandUseCase::new(client.clone(), preview.clone(), &settings),
        AutoParseUseCase::new(preview, &settings),
    );

    Ok(MagnetBot::new(client, router))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let config = load_config()?;
    init_logging(&config)?;

    info!(
        version = magnet_preview::VERSION,
        endpoint = %config.onebot.ws_url,
        "Starting magnet preview bot"
    );

    let bot = create_bot(&config)?;
    bot.run().await?;

    Ok(())
}
