//! Authentication: bearer token issuance/verification and the credential
//! store behind the login endpoints.
//!
//! Both gates (the HTTP endpoints and the WebSocket upgrade) verify tokens
//! through the same [`TokenService`], so accept/reject behavior cannot
//! drift between them.

pub mod credentials;
pub mod token;

pub use credentials::{CredentialError, CredentialStore, InMemoryCredentialStore};
pub use token::{AuthError, DEFAULT_TOKEN_TTL_SECS, TokenService};
