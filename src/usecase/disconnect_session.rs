//! UseCase: session disconnect.
//!
//! Triggered when the transport closes, however it closes. Teardown is
//! best-effort notify, mandatory cleanup: the registry entry and outbound
//! channel are always removed, and announcement failures never reinstate
//! them.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, EventPusher, ServerEvent, Session};

use super::broadcast_event;

/// Orchestrates the disconnect half of the session lifecycle.
pub struct DisconnectSessionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    pusher: Arc<dyn EventPusher>,
}

impl DisconnectSessionUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, pusher: Arc<dyn EventPusher>) -> Self {
        Self { registry, pusher }
    }

    /// Deregister a connection and announce its departure.
    ///
    /// Emits `user_count` with the new total and then `user_left` to every
    /// remaining connection. Deregistering is idempotent: if the connection
    /// was never registered (or a racing teardown already removed it),
    /// nothing is announced and `false` is returned.
    pub async fn execute(&self, session: &Session) -> bool {
        let removed = self.registry.deregister(&session.connection_id).await;
        self.pusher.unregister_channel(&session.connection_id).await;
        if !removed {
            return false;
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
            &ServerEvent::UserLeft {
                username: session.username.as_str().to_string(),
            },
        )
        .await;

        true
    }
}
