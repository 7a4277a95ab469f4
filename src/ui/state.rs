//! Shared application state.

use std::sync::Arc;

use serde::Deserialize;

use crate::auth::{CredentialStore, TokenService};
use crate::domain::{BlobStore, ConnectionRegistry};
use crate::usecase::{ConnectSessionUseCase, DisconnectSessionUseCase, RouteMessageUseCase};

/// Query parameters for the WebSocket upgrade.
///
/// The token defaults to empty when absent so a missing token fails
/// verification (401) instead of failing extraction.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    #[serde(default)]
    pub token: String,
}

/// Shared application state
pub struct AppState {
    pub connect_session_usecase: Arc<ConnectSessionUseCase>,
    pub disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    pub route_message_usecase: Arc<RouteMessageUseCase>,
    /// Source of truth for presence, read by the presence endpoint
    pub registry: Arc<dyn ConnectionRegistry>,
    /// One verifier shared by the HTTP gate and the upgrade gate
    pub token_service: Arc<TokenService>,
    pub credential_store: Arc<dyn CredentialStore>,
    pub blob_store: Arc<dyn BlobStore>,
}
