//! CLI chat client.
//!
//! Logs in (registering the account on first use), connects to the gateway,
//! and sends lines from stdin as chat messages. `/image <url>` shares a
//! previously uploaded image. Reconnects automatically on connection loss
//! (max 5 attempts, 5 second interval); authentication failures exit.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin client -- --username alice --password secret
//! cargo run --bin client -- -u bob -P hunter2 --server http://127.0.0.1:8080
//! ```

use clap::Parser;

use idobata::client::run_client;
use idobata::common::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "CLI client for the group chat gateway", long_about = None)]
struct Args {
    /// Base URL of the gateway
    #[arg(short = 's', long, default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Account username
    #[arg(short = 'u', long)]
    username: String,

    /// Account password
    #[arg(short = 'P', long)]
    password: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = run_client(args.server, args.username, args.password).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
