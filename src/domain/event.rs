//! Wire protocol events exchanged over the persistent connection.

use serde::{Deserialize, Serialize};

/// Event broadcast by the server to connected clients.
///
/// Serialized as an internally tagged JSON object, e.g.
/// `{"type":"text","content":"hi","username":"alice","timestamp":1723000000000}`
/// or `{"type":"user_count","count":2}`.
///
/// `timestamp` is assigned at broadcast time by the server; client-supplied
/// timestamps never reach the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Text {
        content: String,
        username: String,
        timestamp: i64,
    },
    Image {
        content: String,
        username: String,
        timestamp: i64,
    },
    UserCount {
        count: usize,
    },
    UserJoined {
        username: String,
    },
    UserLeft {
        username: String,
    },
}

/// Message a client may send over the persistent connection.
///
/// Anything that does not parse into one of these shapes is dropped by the
/// router without a reply to the sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Text { content: String },
    Image { content: String },
}
