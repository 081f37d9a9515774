use std::time::Duration;

pub const RECONNECT_DELAY_BASE: Duration = Duration::from_secs(1);
pub const RECONNECT_DELAY_MAX: Duration = Duration::from_secs(60);
pub const RECONNECT_JITTER_MAX: Duration = Duration::from_millis(500);
pub const MAX_RECONNECT_ATTEMPTS: u32 = 10;

pub const CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
pub const ACTION_TIMEOUT: Duration = Duration::from_secs(30);

pub const OUTBOUND_BUFFER: usize = 32;

/// OneBot v11 actions the bot calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetMsg,
    GetForwardMsg,
    SendMsg,
    SendGroupForwardMsg,
    SendPrivateForwardMsg,
}

impl Action {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetMsg => "get_msg",
            Self::GetForwardMsg => "get_forward_msg",
            Self::SendMsg => "send_msg",
            Self::SendGroupForwardMsg => "send_group_forward_msg",
            Self::SendPrivateForwardMsg => "send_private_forward_msg",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
