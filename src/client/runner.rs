//! Client execution logic with reconnection support.

use std::time::Duration;

use super::{auth::obtain_token, error::ClientError, session::run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Log in and run the chat client, reconnecting on connection loss.
///
/// Authentication failures are terminal: there is no point retrying with the
/// same credentials.
pub async fn run_client(
    base_url: String,
    username: String,
    password: String,
) -> Result<(), ClientError> {
    let ws_url = websocket_url(&base_url);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Connecting to {} as '{}' (attempt {}/{})",
            ws_url,
            username,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        // A fresh token per attempt; the previous one may have expired while
        // we were disconnected
        let token = match obtain_token(&base_url, &username, &password).await {
            Ok(token) => token,
            Err(e @ ClientError::AuthFailed(_)) => {
                tracing::error!("{e}");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Failed to reach the server: {e}");
                reconnect_count += 1;
                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    return Err(e);
                }
                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
                continue;
            }
        };

        match run_client_session(&ws_url, &token, &username).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // User exit; don't reconnect
                break;
            }
            Err(e @ ClientError::AuthFailed(_)) => {
                tracing::error!("{e}");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Connection lost: {e}");
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}

/// Derive the WebSocket endpoint from the HTTP base URL.
fn websocket_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{}/ws", base.replacen("http", "ws", 1))
}
