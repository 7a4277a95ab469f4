//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::domain::{ClientMessage, ServerEvent};

use super::{error::ClientError, formatter::MessageFormatter, ui::redisplay_prompt};

/// Run one WebSocket client session until the connection ends.
pub async fn run_client_session(
    ws_url: &str,
    token: &str,
    username: &str,
) -> Result<(), ClientError> {
    // The upgrade gate takes the bearer token as a query parameter
    let url = format!("{ws_url}?token={token}");

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(tungstenite::Error::Http(response))
            if response.status() == tungstenite::http::StatusCode::UNAUTHORIZED =>
        {
            return Err(ClientError::AuthFailed(
                "server refused the token at upgrade".to_string(),
            ));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat gateway!");
    println!(
        "\nYou are '{}'. Type messages and press Enter to send; use /image <url> to share an image. Press Ctrl+C to exit.\n",
        username
    );

    let (mut write, mut read) = ws_stream.split();

    // Task: render incoming events
    let username_for_read = username.to_string();
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let line = match serde_json::from_str::<ServerEvent>(&text) {
                        Ok(event) => MessageFormatter::format_event(&event, &username_for_read),
                        Err(_) => MessageFormatter::format_raw(&text),
                    };
                    print!("{line}");
                    redisplay_prompt(&username_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {e}");
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Blocking thread for rustyline (synchronous readline)
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_username = username.to_string();
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {e}");
                return;
            }
        };

        let prompt = format!("{}> ", prompt_username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(e) => {
                    tracing::error!("Readline error: {e}");
                    break;
                }
            }
        }
    });

    // Task: turn input lines into protocol messages
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            let message = match line.strip_prefix("/image ") {
                Some(url) => ClientMessage::Image {
                    content: url.trim().to_string(),
                },
                None => ClientMessage::Text { content: line },
            };

            let json = match serde_json::to_string(&message) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {e}");
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {e}");
                write_error = true;
                break;
            }
        }

        write_error
    });

    // Whichever task finishes first cancels the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            if read_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("connection lost".to_string()));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            if write_result.unwrap_or(false) {
                return Err(ClientError::ConnectionError("connection lost".to_string()));
            }
        }
    }

    Ok(())
}
