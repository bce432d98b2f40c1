use thiserror::Error;

use super::types::{ChannelAddress, ServerEvent};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Best-effort push to whoever is subscribed to an address. Returns the
/// number of live connections the event was handed to; zero means nobody
/// was listening and the event was dropped.
#[cfg_attr(test, mockall::automock)]
pub trait RealtimeChannel: Send + Sync {
    fn emit(&self, address: &ChannelAddress, event: &ServerEvent) -> Result<usize, ChannelError>;
}
