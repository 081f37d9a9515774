mod bot_api_port;
mod link_lookup_port;
mod screenshot_port;

pub use bot_api_port::BotApiPort;
pub use link_lookup_port::LinkLookupPort;
pub use screenshot_port::ScreenshotPort;
