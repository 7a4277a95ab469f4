//! In-memory connection registry.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, RegistryError, Session};

/// Mutex-guarded map of live connections.
///
/// Every mutation goes through the one lock, so `size()` always reflects the
/// mutation history up to the last completed register/deregister.
pub struct InMemoryConnectionRegistry {
    sessions: Mutex<HashMap<ConnectionId, Session>>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, session: Session) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&session.connection_id) {
            return Err(RegistryError::DuplicateHandle(session.connection_id));
        }
        tracing::debug!(
            "registered connection {} for '{}'",
            session.connection_id,
            session.username.as_str()
        );
        sessions.insert(session.connection_id, session);
        Ok(())
    }

    async fn deregister(&self, connection_id: &ConnectionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let removed = sessions.remove(connection_id).is_some();
        if removed {
            tracing::debug!("deregistered connection {connection_id}");
        }
        removed
    }

    async fn size(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn snapshot(&self) -> Vec<ConnectionId> {
        self.sessions.lock().await.keys().copied().collect()
    }

    async fn sessions(&self) -> Vec<Session> {
        self.sessions.lock().await.values().cloned().collect()
    }
}
