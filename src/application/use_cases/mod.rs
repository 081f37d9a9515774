//! Use case implementations.

mod auto_parse_use_case;
mod magnet_command_use_case;
mod preview_use_case;

pub use auto_parse_use_case::AutoParseUseCase;
pub use magnet_command_use_case::MagnetCommandUseCase;
pub use preview_use_case::PreviewUseCase;
