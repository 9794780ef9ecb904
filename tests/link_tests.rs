//! Live round-trip tests for the WebSocket link, against an in-process
//! tokio-tungstenite server.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parley::net::link::{ChatLink, LinkEvent};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

type ServerSocket = WebSocketStream<TcpStream>;

// ============================================================================
// Helper Functions
// ============================================================================

/// Bind an ephemeral port, serve exactly one WebSocket connection with the
/// given handler, and return the server's HTTP base URL.
async fn one_shot_server<F, Fut>(handler: F) -> String
where
    F: FnOnce(ServerSocket) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            if let Ok(socket) = accept_async(stream).await {
                handler(socket).await;
            }
        }
    });
    format!("http://{addr}")
}

async fn recv_event(rx: &mut UnboundedReceiver<LinkEvent>) -> LinkEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for link event")
        .expect("link event channel closed")
}

/// Echoes every inbound text frame back as `{"content": "echo: <text>"}`.
async fn echo_handler(mut socket: ServerSocket) {
    while let Some(Ok(msg)) = socket.next().await {
        if let Message::Text(text) = msg {
            let reply = serde_json::json!({ "content": format!("echo: {text}") }).to_string();
            if socket.send(Message::Text(reply.into())).await.is_err() {
                return;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_connect_opens_and_round_trips_frames() {
    let base = one_shot_server(echo_handler).await;
    let mut link = ChatLink::new(&base);
    let (tx, mut rx) = unbounded_channel();

    link.connect(tx);
    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Opened));

    assert!(link.send("what is rust?"));
    match recv_event(&mut rx).await {
        LinkEvent::Frame(Ok(reply)) => assert_eq!(reply.content, "echo: what is rust?"),
        other => panic!("expected decoded frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_outbound_frames_keep_call_order() {
    let base = one_shot_server(echo_handler).await;
    let mut link = ChatLink::new(&base);
    let (tx, mut rx) = unbounded_channel();

    link.connect(tx);
    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Opened));

    assert!(link.send("first"));
    assert!(link.send("second"));

    let mut replies = Vec::new();
    for _ in 0..2 {
        match recv_event(&mut rx).await {
            LinkEvent::Frame(Ok(reply)) => replies.push(reply.content),
            other => panic!("expected decoded frame, got {other:?}"),
        }
    }
    assert_eq!(replies, vec!["echo: first", "echo: second"]);
}

#[tokio::test]
async fn test_malformed_frame_surfaces_as_decode_error() {
    let base = one_shot_server(|mut socket: ServerSocket| async move {
        let _ = socket
            .send(Message::Text(String::from("definitely not json").into()))
            .await;
        // Keep the socket open so only the bad frame is observed
        let _ = socket.next().await;
    })
    .await;

    let mut link = ChatLink::new(&base);
    let (tx, mut rx) = unbounded_channel();
    link.connect(tx);

    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Opened));
    assert!(matches!(
        recv_event(&mut rx).await,
        LinkEvent::Frame(Err(_))
    ));
}

#[tokio::test]
async fn test_server_close_reports_closed() {
    let base = one_shot_server(|mut socket: ServerSocket| async move {
        let _ = socket.close(None).await;
    })
    .await;

    let mut link = ChatLink::new(&base);
    let (tx, mut rx) = unbounded_channel();
    link.connect(tx);

    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Opened));
    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Closed));
}

#[tokio::test]
async fn test_connect_failure_reports_failed() {
    // Nothing listens on the discard port
    let mut link = ChatLink::new("http://127.0.0.1:9");
    let (tx, mut rx) = unbounded_channel();
    link.connect(tx);

    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Failed(_)));
}

#[tokio::test]
async fn test_disconnect_drops_the_outbound_queue() {
    let base = one_shot_server(echo_handler).await;
    let mut link = ChatLink::new(&base);
    let (tx, mut rx) = unbounded_channel();

    link.connect(tx);
    assert!(matches!(recv_event(&mut rx).await, LinkEvent::Opened));
    assert!(link.send("hello"));

    link.disconnect();
    assert!(!link.send("dropped"));
}
