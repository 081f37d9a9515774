use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

/// Command-line overrides for the config file.
#[derive(Debug, Parser)]
#[command(
    name = "magnet-preview",
    version,
    about = "A OneBot chat bot that previews magnet links",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// OneBot WebSocket endpoint.
    #[arg(long, value_name = "URL", env = "MAGNET_PREVIEW_WS_URL")]
    pub ws_url: Option<String>,

    /// OneBot access token.
    #[arg(long, env = "MAGNET_PREVIEW_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Send screenshot links as text instead of images.
    #[arg(long)]
    pub output_as_link: Option<bool>,

    /// Preview links posted without a command.
    #[arg(long)]
    pub auto_parse: Option<bool>,

    /// Base URL of the lookup service.
    #[arg(long, value_name = "URL")]
    pub whatslink_url: Option<String>,
}
