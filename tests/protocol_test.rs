//! End-to-end protocol tests: drive a real server process with raw HTTP and
//! WebSocket clients and assert the exact wire behavior of both gates and
//! the broadcast path.

use std::net::TcpStream;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream as TokioTcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};

use idobata::domain::ServerEvent;
use idobata::infrastructure::dto::http::{PresenceResponse, TokenResponse, UploadResponse};

type WsStream = WebSocketStream<MaybeTlsStream<TokioTcpStream>>;

/// Server child process that is killed on drop
struct TestServer {
    process: Child,
    port: u16,
}

impl TestServer {
    fn start(port: u16) -> Self {
        Self::start_with_args(port, &[])
    }

    fn start_with_args(port: u16, extra_args: &[&str]) -> Self {
        let port_string = port.to_string();
        let mut args = vec!["run", "--bin", "server", "--", "--port", &port_string];
        args.extend_from_slice(extra_args);

        let process = Command::new("cargo")
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start server");

        let server = TestServer { process, port };
        server.wait_until_ready();
        server
    }

    /// Poll the listen port until the server accepts connections (the first
    /// run may include compile time).
    fn wait_until_ready(&self) {
        for _ in 0..600 {
            if TcpStream::connect(("127.0.0.1", self.port)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(100));
        }
        panic!("server did not start listening on port {}", self.port);
    }

    fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    fn ws_url(&self, token: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?token={token}", self.port)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

async fn register(server: &TestServer, username: &str) -> String {
    let response = reqwest::Client::new()
        .post(format!("{}/api/register", server.base_url()))
        .json(&serde_json::json!({"username": username, "password": "password"}))
        .send()
        .await
        .expect("register request failed");
    assert!(response.status().is_success(), "register should succeed");
    response
        .json::<TokenResponse>()
        .await
        .expect("token response should parse")
        .token
}

async fn next_event(ws: &mut WsStream) -> ServerEvent {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(10), ws.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream ended unexpectedly")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).expect("event should parse");
        }
    }
}

fn assert_unauthorized(result: Result<(WsStream, tungstenite::handshake::client::Response), tungstenite::Error>) {
    match result {
        Err(tungstenite::Error::Http(response)) => {
            assert_eq!(response.status(), tungstenite::http::StatusCode::UNAUTHORIZED);
        }
        Err(other) => panic!("expected an HTTP 401 rejection, got: {other:?}"),
        Ok(_) => panic!("upgrade should have been refused"),
    }
}

#[tokio::test]
async fn test_upgrade_is_refused_for_bad_tokens_and_leaves_no_presence() {
    let server = TestServer::start(18090);
    let token = register(&server, "alice").await;

    // a tampered token is refused at the upgrade
    let mut tampered = token.clone();
    tampered.push('x');
    assert_unauthorized(connect_async(server.ws_url(&tampered)).await);

    // a missing token is refused the same way
    assert_unauthorized(connect_async(server.ws_url("")).await);

    // neither attempt produced a registry entry
    let presence = reqwest::Client::new()
        .get(format!("{}/api/presence", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("presence request failed")
        .json::<PresenceResponse>()
        .await
        .expect("presence response should parse");
    assert_eq!(presence.count, 0);
    assert!(presence.usernames.is_empty());
}

#[tokio::test]
async fn test_expired_tokens_are_refused_by_both_gates() {
    // A server whose tokens are already expired when issued
    let server = TestServer::start_with_args(18091, &["--token-ttl-secs=-3600"]);
    let token = register(&server, "alice").await;

    // the HTTP gate refuses it
    let response = reqwest::Client::new()
        .get(format!("{}/api/me", server.base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("me request failed");
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    // and the upgrade gate refuses it identically
    assert_unauthorized(connect_async(server.ws_url(&token)).await);
}

#[tokio::test]
async fn test_join_message_and_leave_follow_the_documented_event_order() {
    let server = TestServer::start(18092);
    let alice_token = register(&server, "alice").await;
    let bob_token = register(&server, "bob").await;

    // alice connects and sees her own join, count first
    let (mut alice_ws, _) = connect_async(server.ws_url(&alice_token))
        .await
        .expect("alice should connect");
    assert_eq!(next_event(&mut alice_ws).await, ServerEvent::UserCount { count: 1 });
    assert_eq!(
        next_event(&mut alice_ws).await,
        ServerEvent::UserJoined {
            username: "alice".to_string()
        }
    );

    // bob connects; both see count=2 then bob's join
    let (mut bob_ws, _) = connect_async(server.ws_url(&bob_token))
        .await
        .expect("bob should connect");
    for ws in [&mut alice_ws, &mut bob_ws] {
        assert_eq!(next_event(ws).await, ServerEvent::UserCount { count: 2 });
        assert_eq!(
            next_event(ws).await,
            ServerEvent::UserJoined {
                username: "bob".to_string()
            }
        );
    }

    // alice sends a message; both receive it with her identity and a
    // server-assigned timestamp
    alice_ws
        .send(Message::Text(
            r#"{"type":"text","content":"hi","timestamp":1}"#.into(),
        ))
        .await
        .expect("send should succeed");
    for ws in [&mut alice_ws, &mut bob_ws] {
        match next_event(ws).await {
            ServerEvent::Text {
                content,
                username,
                timestamp,
            } => {
                assert_eq!(content, "hi");
                assert_eq!(username, "alice");
                // stamped by the router, not copied from the frame
                assert!(timestamp > 1_000_000_000_000);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    // bob leaves; alice sees count=1 then bob's departure
    bob_ws.close(None).await.expect("close should succeed");
    assert_eq!(next_event(&mut alice_ws).await, ServerEvent::UserCount { count: 1 });
    assert_eq!(
        next_event(&mut alice_ws).await,
        ServerEvent::UserLeft {
            username: "bob".to_string()
        }
    );
}

#[tokio::test]
async fn test_uploaded_image_url_round_trips_through_chat() {
    let server = TestServer::start(18093);
    let token = register(&server, "alice").await;
    let client = reqwest::Client::new();

    // upload a small png
    let png_bytes = vec![0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];
    let part = reqwest::multipart::Part::bytes(png_bytes.clone())
        .file_name("dot.png")
        .mime_str("image/png")
        .expect("mime should parse");
    let form = reqwest::multipart::Form::new().part("image", part);
    let upload = client
        .post(format!("{}/upload", server.base_url()))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("upload request failed");
    assert!(upload.status().is_success(), "upload should succeed");
    let image_url = upload
        .json::<UploadResponse>()
        .await
        .expect("upload response should parse")
        .image_url;

    // the stored bytes are retrievable at the returned url
    let fetched = client
        .get(format!("{}{}", server.base_url(), image_url))
        .send()
        .await
        .expect("fetch request failed");
    assert!(fetched.status().is_success());
    assert_eq!(fetched.bytes().await.expect("body should read"), png_bytes);

    // and the url is broadcast verbatim as image content
    let (mut ws, _) = connect_async(server.ws_url(&token))
        .await
        .expect("websocket should connect");
    next_event(&mut ws).await; // user_count
    next_event(&mut ws).await; // user_joined

    let frame = serde_json::json!({"type": "image", "content": image_url}).to_string();
    ws.send(Message::Text(frame.into()))
        .await
        .expect("send should succeed");
    match next_event(&mut ws).await {
        ServerEvent::Image { content, username, .. } => {
            assert_eq!(content, image_url);
            assert_eq!(username, "alice");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn test_oversized_and_wrong_type_uploads_are_rejected() {
    let server = TestServer::start(18094);
    let token = register(&server, "alice").await;
    let client = reqwest::Client::new();

    // wrong content type
    let part = reqwest::multipart::Part::bytes(vec![1, 2, 3])
        .file_name("doc.pdf")
        .mime_str("application/pdf")
        .expect("mime should parse");
    let response = client
        .post(format!("{}/upload", server.base_url()))
        .bearer_auth(&token)
        .multipart(reqwest::multipart::Form::new().part("image", part))
        .send()
        .await
        .expect("upload request failed");
    assert_eq!(
        response.status(),
        reqwest::StatusCode::UNSUPPORTED_MEDIA_TYPE
    );

    // just over the 5 MiB image limit (still within the request body limit,
    // so the rejection comes from the store, not the transport)
    let oversized = vec![0u8; 5 * 1024 * 1024 + 1024];
    let part = reqwest::multipart::Part::bytes(oversized)
        .file_name("big.png")
        .mime_str("image/png")
        .expect("mime should parse");
    let response = client
        .post(format!("{}/upload", server.base_url()))
        .bearer_auth(&token)
        .multipart(reqwest::multipart::Form::new().part("image", part))
        .send()
        .await
        .expect("upload request failed");
    assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
}
