use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

use super::{
    channel::{ChannelError, RealtimeChannel},
    types::{ChannelAddress, ServerEvent},
};

pub type WsSender = mpsc::UnboundedSender<String>;

struct Subscriber {
    connection_id: Uuid,
    sender: WsSender,
}

/// Live websocket connections grouped by channel. A user may have several
/// tabs open; every one of them sits in the same channel.
#[derive(Clone)]
pub struct ConnectionManager {
    channels: Arc<DashMap<ChannelAddress, Vec<Subscriber>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
        }
    }

    /// Join `address`; the returned id is needed to leave again.
    pub fn subscribe(&self, address: ChannelAddress, sender: WsSender) -> Uuid {
        let connection_id = Uuid::new_v4();
        self.channels
            .entry(address)
            .or_default()
            .push(Subscriber {
                connection_id,
                sender,
            });
        tracing::info!(channel = %address, %connection_id, "client joined channel");
        connection_id
    }

    pub fn unsubscribe(&self, address: &ChannelAddress, connection_id: Uuid) {
        if let Some(mut subscribers) = self.channels.get_mut(address) {
            subscribers.retain(|s| s.connection_id != connection_id);
        }
        self.channels.remove_if(address, |_, subscribers| subscribers.is_empty());
        tracing::info!(channel = %address, %connection_id, "client left channel");
    }

    pub fn is_online(&self, address: &ChannelAddress) -> bool {
        self.channels
            .get(address)
            .map(|subscribers| !subscribers.is_empty())
            .unwrap_or(false)
    }

    pub fn connection_count(&self) -> usize {
        self.channels.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeChannel for ConnectionManager {
    fn emit(&self, address: &ChannelAddress, event: &ServerEvent) -> Result<usize, ChannelError> {
        let frame = serde_json::to_string(event)?;

        let delivered = match self.channels.get_mut(address) {
            Some(mut subscribers) => {
                // closed connections fall out here
                subscribers.retain(|s| s.sender.send(frame.clone()).is_ok());
                subscribers.len()
            }
            None => 0,
        };

        if delivered == 0 {
            self.channels.remove_if(address, |_, subscribers| subscribers.is_empty());
        }

        Ok(delivered)
    }
}
