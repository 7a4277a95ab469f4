//! Connection registry interface.
//!
//! The registry is the single source of truth for presence: an entry exists
//! exactly while the underlying transport is open, and `size()` is the
//! presence count. All mutation funnels through one implementation-owned
//! serialization point.

use async_trait::async_trait;
use thiserror::Error;

use super::session::{ConnectionId, Session};

/// Registry errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// Registering an already-present handle is a lifecycle bug in the
    /// caller; handles are minted fresh per connection.
    #[error("connection handle '{0}' is already registered")]
    DuplicateHandle(ConnectionId),
}

/// Live mapping of connection handles to authenticated sessions.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Insert a session. The handle must not already be present.
    async fn register(&self, session: Session) -> Result<(), RegistryError>;

    /// Remove the entry if present. Removing an absent handle is a no-op
    /// (disconnect signals can race with teardown); returns whether an entry
    /// was actually removed.
    async fn deregister(&self, connection_id: &ConnectionId) -> bool;

    /// Current number of registered connections.
    async fn size(&self) -> usize;

    /// Handles of every connection registered at the moment of the call.
    ///
    /// Broadcasts iterate this snapshot rather than holding the registry
    /// locked across the fan-out.
    async fn snapshot(&self) -> Vec<ConnectionId>;

    /// Every registered session at the moment of the call.
    async fn sessions(&self) -> Vec<Session>;
}
