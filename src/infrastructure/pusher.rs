//! Channel-backed event pusher.
//!
//! Each connection owns a bounded outbound channel; its WebSocket writer
//! task drains the receiving end. Fan-out enqueues with `try_send`, so a
//! slow or stalled recipient never blocks delivery to the others. A
//! connection whose buffer overflows loses its channel on the spot, which
//! ends its writer task and lets the normal disconnect path run.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{ConnectionId, EventPusher, PusherChannel};

/// In-memory map of connection handles to their outbound channels.
pub struct ChannelEventPusher {
    channels: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl ChannelEventPusher {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for ChannelEventPusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPusher for ChannelEventPusher {
    async fn register_channel(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(connection_id, sender);
        tracing::debug!("channel registered for connection {connection_id}");
    }

    async fn unregister_channel(&self, connection_id: &ConnectionId) {
        let mut channels = self.channels.lock().await;
        channels.remove(connection_id);
        tracing::debug!("channel unregistered for connection {connection_id}");
    }

    async fn broadcast(&self, targets: &[ConnectionId], payload: &str) {
        let mut channels = self.channels.lock().await;
        for target in targets {
            let drop_channel = match channels.get(target) {
                Some(sender) => match sender.try_send(payload.to_string()) {
                    Ok(()) => false,
                    Err(TrySendError::Full(_)) => {
                        tracing::warn!(
                            "outbound buffer full for connection {target}, dropping it"
                        );
                        true
                    }
                    Err(TrySendError::Closed(_)) => {
                        tracing::debug!("channel for connection {target} already closed");
                        true
                    }
                },
                None => {
                    tracing::warn!("no channel for connection {target}, skipping");
                    false
                }
            };
            if drop_channel {
                channels.remove(target);
            }
        }
    }
}
