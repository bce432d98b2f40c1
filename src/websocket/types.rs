use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::notification::Notification;

/// The per-user channel a client joins on connect. Wrapping the user id
/// keeps notification ids and other uuids from being used as addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelAddress(Uuid);

impl ChannelAddress {
    pub fn for_user(user_id: Uuid) -> Self {
        Self(user_id)
    }

    pub fn user_id(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server-to-client frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    NewNotification(Notification),
}
