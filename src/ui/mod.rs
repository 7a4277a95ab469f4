//! UI layer: HTTP routing, the two authentication gates, and WebSocket
//! connection handling.

pub mod extract;
pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use server::Server;
pub use state::AppState;
