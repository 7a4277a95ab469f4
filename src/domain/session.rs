//! Live connection handle and the session bound to it.

use std::fmt;

use uuid::Uuid;

use super::identity::Username;

/// Process-unique handle for one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    /// Mint a fresh handle. Handles are never reused within a process.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One authenticated, registered connection.
///
/// The username is bound once at registration and never changes for the
/// lifetime of the connection; re-authentication mid-connection is not
/// supported.
#[derive(Debug, Clone)]
pub struct Session {
    pub connection_id: ConnectionId,
    pub username: Username,
    /// Unix timestamp when the connection was registered (UTC, milliseconds)
    pub connected_at: i64,
}

impl Session {
    pub fn new(username: Username, connected_at: i64) -> Self {
        Self {
            connection_id: ConnectionId::generate(),
            username,
            connected_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_ids_are_unique() {
        // given / when:
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then:
        assert_ne!(a, b);
    }

    #[test]
    fn test_sessions_for_the_same_username_get_distinct_handles() {
        // The same identity may hold several simultaneous connections.
        let alice = Username::new("alice".to_string()).unwrap();
        let first = Session::new(alice.clone(), 1000);
        let second = Session::new(alice, 1000);
        assert_ne!(first.connection_id, second.connection_id);
    }
}
