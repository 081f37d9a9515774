//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::dto::PreviewSettings;
use crate::domain::entities::AccessToken;
use crate::domain::serde_utils::id_string;

pub(crate) const APP_NAME: &str = "magnet-preview";
pub(crate) const APP_QUALIFIER: &str = "com";
pub(crate) const APP_ORGANIZATION: &str = "magnet-preview";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Group ID accepted as either a TOML string or integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(#[serde(with = "id_string")] pub String);

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// OneBot connection settings.
    #[serde(default)]
    pub onebot: OneBotConfig,

    /// Preview behavior.
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Lookup service settings.
    #[serde(default)]
    pub whatslink: WhatslinkConfig,
}

/// OneBot v11 forward WebSocket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneBotConfig {
    /// WebSocket endpoint of the OneBot implementation.
    #[serde(default = "default_ws_url")]
    pub ws_url: String,

    /// Access token sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// Reconnect after the connection drops.
    #[serde(default = "default_true")]
    pub auto_reconnect: bool,

    /// Reconnect attempts before giving up.
    #[serde(default = "default_max_reconnect_attempts")]
    pub max_reconnect_attempts: u32,
}

impl OneBotConfig {
    /// Returns the configured access token, if not blank.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.access_token.clone().and_then(AccessToken::new)
    }
}

impl Default for OneBotConfig {
    fn default() -> Self {
        Self {
            ws_url: default_ws_url(),
            access_token: None,
            auto_reconnect: true,
            max_reconnect_attempts: default_max_reconnect_attempts(),
        }
    }
}

/// Preview behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Send screenshot links as text instead of images.
    #[serde(default)]
    pub output_as_link: bool,

    /// Screenshots per link (clamped to 0..=5).
    #[serde(default = "default_max_screenshot_count")]
    pub max_screenshot_count: i64,

    /// Blur strength for screenshots; 0 disables blurring.
    #[serde(default = "default_cover_mosaic_level")]
    pub cover_mosaic_level: f64,

    /// Links previewed per message (clamped to 1..=10).
    #[serde(default = "default_max_magnet_count")]
    pub max_magnet_count: i64,

    /// Preview links posted without a command.
    #[serde(default = "default_true")]
    pub auto_parse: bool,

    /// Groups the bot answers in. Empty allows every group.
    #[serde(default)]
    pub group_whitelist: Vec<GroupId>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            output_as_link: false,
            max_screenshot_count: default_max_screenshot_count(),
            cover_mosaic_level: default_cover_mosaic_level(),
            max_magnet_count: default_max_magnet_count(),
            auto_parse: true,
            group_whitelist: Vec::new(),
        }
    }
}

/// Lookup service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatslinkConfig {
    /// Base URL of the lookup service.
    #[serde(default = "default_whatslink_url")]
    pub base_url: String,

    /// Request timeout in seconds, for lookups and screenshot downloads.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhatslinkConfig {
    fn default() -> Self {
        Self {
            base_url: default_whatslink_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:3001".to_string()
}

fn default_whatslink_url() -> String {
    crate::application::services::preview_formatter::LOOKUP_HOST.to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_reconnect_attempts() -> u32 {
    10
}

fn default_max_screenshot_count() -> i64 {
    3
}

fn default_cover_mosaic_level() -> f64 {
    0.3
}

fn default_max_magnet_count() -> i64 {
    1
}

fn default_timeout_secs() -> u64 {
    10
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(ws_url) = args.ws_url {
            self.onebot.ws_url = ws_url;
        }
        if let Some(access_token) = args.access_token {
            self.onebot.access_token = Some(access_token);
        }
        if let Some(output_as_link) = args.output_as_link {
            self.preview.output_as_link = output_as_link;
        }
        if let Some(auto_parse) = args.auto_parse {
            self.preview.auto_parse = auto_parse;
        }
        if let Some(whatslink_url) = args.whatslink_url {
            self.whatslink.base_url = whatslink_url;
        }
    }

    /// Builds the clamped settings the use cases run with.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn preview_settings(&self) -> PreviewSettings {
        PreviewSettings {
            output_as_link: self.preview.output_as_link,
            max_screenshots: PreviewSettings::clamp_screenshots(self.preview.max_screenshot_count),
            cover_mosaic_level: (self.preview.cover_mosaic_level as f32).max(0.0),
            max_magnet_count: PreviewSettings::clamp_magnets(self.preview.max_magnet_count),
            auto_parse: self.preview.auto_parse,
            group_whitelist: self
                .preview
                .group_whitelist
                .iter()
                .map(|g| g.0.clone())
                .collect(),
            lookup_base_url: self.whatslink.base_url.clone(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::Info,
            onebot: OneBotConfig::default(),
            preview: PreviewConfig::default(),
            whatslink: WhatslinkConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            log_level = "debug"

            [onebot]
            ws_url = "ws://10.0.0.2:6700"
            access_token = "secret"

            [preview]
            output_as_link = true
            max_screenshot_count = 9
            cover_mosaic_level = 0.5
            max_magnet_count = 0
            group_whitelist = [123456, "654321"]

            [whatslink]
            base_url = "https://mirror.example"
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.onebot.ws_url, "ws://10.0.0.2:6700");
        assert_eq!(config.onebot.token().unwrap().as_str(), "secret");
        assert!(config.onebot.auto_reconnect);

        let settings = config.preview_settings();
        assert!(settings.output_as_link);
        assert_eq!(settings.max_screenshots, 5);
        assert_eq!(settings.max_magnet_count, 1);
        assert!((settings.cover_mosaic_level - 0.5).abs() < f32::EPSILON);
        assert_eq!(settings.group_whitelist, vec!["123456", "654321"]);
        assert_eq!(settings.lookup_base_url, "https://mirror.example");
        assert_eq!(config.whatslink.timeout_secs, 10);
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.onebot.ws_url, "ws://127.0.0.1:3001");
        assert!(config.onebot.token().is_none());

        let settings = config.preview_settings();
        assert_eq!(settings, PreviewSettings::default());
    }

    #[test]
    fn test_blank_token_ignored() {
        let config: AppConfig = toml::from_str("[onebot]\naccess_token = \"  \"").unwrap();
        assert!(config.onebot.token().is_none());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = AppConfig::default();
        config.merge_with_args(CliArgs {
            config: None,
            log_path: None,
            log_level: Some(LogLevel::Trace),
            ws_url: Some("ws://bot:8080".to_string()),
            access_token: None,
            output_as_link: None,
            auto_parse: Some(false),
            whatslink_url: None,
        });

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.onebot.ws_url, "ws://bot:8080");
        assert!(!config.preview.auto_parse);
    }
}
