//! Event pusher interface: the fan-out half of the broadcast bus.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::session::ConnectionId;

/// Per-connection outbound channel. Bounded, so a stalled recipient
/// backpressures into its own buffer instead of the broadcast path.
pub type PusherChannel = mpsc::Sender<String>;

/// Capacity of each connection's outbound buffer. A connection whose buffer
/// overflows is dropped rather than allowed to stall delivery to others.
pub const OUTBOUND_BUFFER_CAPACITY: usize = 256;

/// Delivers serialized events to connections by handle.
///
/// Delivery is best-effort: there is no acknowledgment and no retry, and a
/// handle with no channel (mid-disconnect) is skipped.
#[async_trait]
pub trait EventPusher: Send + Sync {
    /// Attach the outbound channel for a connection.
    async fn register_channel(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// Detach a connection's outbound channel, if present.
    async fn unregister_channel(&self, connection_id: &ConnectionId);

    /// Enqueue `payload` to every target that still has a channel.
    async fn broadcast(&self, targets: &[ConnectionId], payload: &str);
}
