//! Use cases orchestrating the session lifecycle and message routing.

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod route_message;

pub use connect_session::ConnectSessionUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, RouteMessageError};
pub use route_message::RouteMessageUseCase;

use crate::domain::{ConnectionId, EventPusher, ServerEvent};

/// Serialize one event and hand it to the pusher for best-effort fan-out.
///
/// Encoding failure is treated like any other delivery failure: logged and
/// dropped, never propagated.
pub(crate) async fn broadcast_event(
    pusher: &dyn EventPusher,
    targets: &[ConnectionId],
    event: &ServerEvent,
) {
    match serde_json::to_string(event) {
        Ok(payload) => pusher.broadcast(targets, &payload).await,
        Err(e) => tracing::warn!("failed to encode outbound event: {e}"),
    }
}
