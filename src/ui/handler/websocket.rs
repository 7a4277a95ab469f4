//! WebSocket connection handler: the upgrade gate and the per-connection
//! read/write tasks.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::domain::{OUTBOUND_BUFFER_CAPACITY, Session};

use super::super::state::{AppState, ConnectQuery};

/// Gate and register a new connection, then hand it to the socket tasks.
///
/// The token is verified before the upgrade completes: a bad token refuses
/// the upgrade outright and no transport, registry entry, or channel is ever
/// created for it.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let username = match state.token_service.verify(&query.token) {
        Ok(username) => username,
        Err(e) => {
            tracing::warn!("rejecting websocket upgrade: {e}");
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    // Bounded buffer per connection; overflow drops the connection rather
    // than stalling broadcasts (see ChannelEventPusher).
    let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER_CAPACITY);

    let session = match state
        .connect_session_usecase
        .execute(username, tx)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("failed to register connection: {e}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    tracing::info!(
        "user '{}' connected as {}",
        session.username.as_str(),
        session.connection_id
    );

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session, rx)))
}

/// Drain the connection's outbound buffer into its WebSocket sink.
fn writer_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(Message::Text(payload.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    session: Session,
    rx: mpsc::Receiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let mut send_task = writer_loop(rx, sender);

    let session_for_recv = session.clone();
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::error!("websocket error: {e}");
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    if let Err(e) = state_for_recv
                        .route_message_usecase
                        .execute(&session_for_recv, &text)
                        .await
                    {
                        // Dropped without a reply to the sender
                        tracing::warn!(
                            "dropping frame from '{}': {e}",
                            session_for_recv.username.as_str()
                        );
                    }
                }
                Message::Close(_) => {
                    tracing::info!(
                        "connection {} requested close",
                        session_for_recv.connection_id
                    );
                    break;
                }
                Message::Ping(_) => {
                    tracing::debug!("received ping");
                    // Pong is handled by the protocol layer
                }
                _ => {}
            }
        }
    });

    // Whichever side finishes first cancels the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if state.disconnect_session_usecase.execute(&session).await {
        tracing::info!(
            "user '{}' disconnected ({})",
            session.username.as_str(),
            session.connection_id
        );
    }
}
