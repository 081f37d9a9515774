//! Domain error types.

mod bot_api_error;
mod lookup_error;

pub use bot_api_error::BotApiError;
pub use lookup_error::LookupError;
