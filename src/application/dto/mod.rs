//! Data transfer objects for the application layer.

mod command_dto;
mod preview_settings;

pub use command_dto::{
    COMMAND_NAMES, COMMAND_PREFIX, CommandArgument, MagnetCommand, starts_with_command,
};
pub use preview_settings::{MAX_MAGNET_LIMIT, MAX_SCREENSHOT_LIMIT, PreviewSettings};
