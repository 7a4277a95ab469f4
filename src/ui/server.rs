//! Server assembly and execution.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth::{CredentialStore, TokenService};
use crate::domain::{BlobStore, ConnectionRegistry};
use crate::infrastructure::MAX_IMAGE_BYTES;
use crate::usecase::{ConnectSessionUseCase, DisconnectSessionUseCase, RouteMessageUseCase};

use super::{
    handler::{
        http::{
            health_check, login, logout, me, presence, register, serve_upload, upload_image,
        },
        websocket::websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// The chat gateway server.
pub struct Server {
    connect_session_usecase: Arc<ConnectSessionUseCase>,
    disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
    route_message_usecase: Arc<RouteMessageUseCase>,
    registry: Arc<dyn ConnectionRegistry>,
    token_service: Arc<TokenService>,
    credential_store: Arc<dyn CredentialStore>,
    blob_store: Arc<dyn BlobStore>,
}

impl Server {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        connect_session_usecase: Arc<ConnectSessionUseCase>,
        disconnect_session_usecase: Arc<DisconnectSessionUseCase>,
        route_message_usecase: Arc<RouteMessageUseCase>,
        registry: Arc<dyn ConnectionRegistry>,
        token_service: Arc<TokenService>,
        credential_store: Arc<dyn CredentialStore>,
        blob_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            connect_session_usecase,
            disconnect_session_usecase,
            route_message_usecase,
            registry,
            token_service,
            credential_store,
            blob_store,
        }
    }

    /// Run the gateway until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app_state = Arc::new(AppState {
            connect_session_usecase: self.connect_session_usecase,
            disconnect_session_usecase: self.disconnect_session_usecase,
            route_message_usecase: self.route_message_usecase,
            registry: self.registry,
            token_service: self.token_service,
            credential_store: self.credential_store,
            blob_store: self.blob_store,
        });

        let app = Router::new()
            // WebSocket endpoint (upgrade gate)
            .route("/ws", get(websocket_handler))
            // session endpoints
            .route("/api/register", post(register))
            .route("/api/login", post(login))
            .route("/api/logout", post(logout))
            .route("/api/me", get(me))
            .route("/api/presence", get(presence))
            // upload pipeline
            .route(
                "/upload",
                post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
            )
            .route("/uploads/{name}", get(serve_upload))
            .route("/api/health", get(health_check))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state);

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!("chat gateway listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws?token=<token>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
