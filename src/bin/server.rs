//! Group chat gateway server.
//!
//! Clients register or log in over HTTP to obtain a bearer token, then
//! connect to `/ws?token=<token>`; messages and presence changes are
//! broadcast to every live connection.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin server
//! cargo run --bin server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

use idobata::{
    auth::{DEFAULT_TOKEN_TTL_SECS, InMemoryCredentialStore, TokenService},
    common::{logger::setup_logger, time::SystemClock},
    infrastructure::{ChannelEventPusher, InMemoryBlobStore, InMemoryConnectionRegistry},
    ui::Server,
    usecase::{ConnectSessionUseCase, DisconnectSessionUseCase, RouteMessageUseCase},
};

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Group chat gateway with token-gated sessions", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Secret used to sign bearer tokens. Override outside development.
    #[arg(long, default_value = "idobata-dev-secret-change-me")]
    token_secret: String,

    /// Token lifetime in seconds
    #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_SECS)]
    token_ttl_secs: i64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Shared infrastructure: registry, pusher, clock
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let pusher = Arc::new(ChannelEventPusher::new());
    let clock = Arc::new(SystemClock);

    // UseCases
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        registry.clone(),
        pusher.clone(),
    ));
    let route_message_usecase = Arc::new(RouteMessageUseCase::new(
        registry.clone(),
        pusher.clone(),
        clock.clone(),
    ));

    // Auth and upload collaborators
    let token_service = Arc::new(TokenService::new(&args.token_secret, args.token_ttl_secs));
    let credential_store = Arc::new(InMemoryCredentialStore::new());
    let blob_store = Arc::new(InMemoryBlobStore::new());

    let server = Server::new(
        connect_session_usecase,
        disconnect_session_usecase,
        route_message_usecase,
        registry,
        token_service,
        credential_store,
        blob_store,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
