//! Group chat gateway library.
//!
//! This library provides the server and client implementations for a
//! WebSocket group chat gateway: sessions are gated by a bearer token, and
//! messages plus presence changes are broadcast to every live connection.

// layers
pub mod auth;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// client and shared helpers
pub mod client;
pub mod common;
