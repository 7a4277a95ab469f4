//! UseCase: session connect.
//!
//! Runs after the upgrade gate has verified the bearer token: the identity
//! arriving here is already authenticated. Registers the connection and
//! announces it to everyone currently connected, including the new
//! connection itself.

use std::sync::Arc;

use crate::common::time::Clock;
use crate::domain::{
    ConnectionRegistry, EventPusher, PusherChannel, ServerEvent, Session, Username,
};

use super::{broadcast_event, error::ConnectError};

/// Orchestrates the connect half of the session lifecycle.
pub struct ConnectSessionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
    clock: Arc<dyn Clock>,
}

impl ConnectSessionUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        pusher: Arc<dyn EventPusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            pusher,
            clock,
        }
    }

    /// Register a verified identity's new connection and announce it.
    ///
    /// Emits, in this order, `user_count` with the new total and then
    /// `user_joined` naming the identity, to every connection registered at
    /// that moment (the new one included). Consumers rely on count-then-name
    /// so presence UIs never see a transient mismatch.
    pub async fn execute(
        &self,
        username: Username,
        sender: PusherChannel,
    ) -> Result<Session, ConnectError> {
        let session = Session::new(username, self.clock.now_millis());

        // The channel goes in first so the new connection is reachable the
        // moment its registry entry appears in a broadcast snapshot.
        self.pusher
            .register_channel(session.connection_id, sender)
            .await;
        if let Err(e) = self.registry.register(session.clone()).await {
            self.pusher.unregister_channel(&session.connection_id).await;
            return Err(e.into());
        }

        let count = self.registry.size().await;
        let targets = self.registry.snapshot().await;
        broadcast_event(
            self.pusher.as_ref(),
            &targets,
            &ServerEvent::UserCount { count },
        )
        .await;
        broadcast_event(
            self.pusher.as_ref(),
            &targets,
            &ServerEvent::UserJoined {
                username: session.username.as_str().to_string(),
            },
        )
        .await;

        Ok(session)
    }
}
