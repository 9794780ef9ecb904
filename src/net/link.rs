//! WebSocket link to the agent backend.
//!
//! `ChatLink` owns the single connection: a connector task that dials the
//! server, then a pump that moves outbound text frames from a queue onto the
//! socket and decoded inbound frames into a `LinkEvent` channel. Establishing
//! a new connection always tears down the previous one first, so at most one
//! connection is alive at any time.
//!
//! Errors are terminal: the link never retries on its own. The reducer turns
//! every `LinkEvent` into a transcript message and decides when (if ever) a
//! new `connect()` happens.

use futures::{SinkExt, StreamExt};
use log::{info, warn};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::AbortHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::types::{AgentReply, FrameError, decode_frame};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle of the backend connection. Errors collapse into `Closed`; the
/// only way out of `Closed` is an explicit new `connect()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closed,
}

/// Events the link tasks report back to the event loop.
#[derive(Debug, PartialEq)]
pub enum LinkEvent {
    Opened,
    /// One inbound text frame, decoded (or not).
    Frame(Result<AgentReply, FrameError>),
    /// Dial or transport failure; the connection is gone.
    Failed(String),
    /// Orderly close from the server side.
    Closed,
}

/// Handle to the current connection generation.
pub struct ChatLink {
    url: String,
    outbound: Option<mpsc::Sender<String>>,
    tasks: Vec<AbortHandle>,
}

impl ChatLink {
    pub fn new(server_url: &str) -> Self {
        Self {
            url: socket_url(server_url),
            outbound: None,
            tasks: Vec::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open a fresh connection, replacing any live one. Lifecycle and frame
    /// events arrive on `events`.
    pub fn connect(&mut self, events: UnboundedSender<LinkEvent>) {
        self.disconnect();

        let (out_tx, out_rx) = mpsc::channel::<String>(32);
        self.outbound = Some(out_tx);

        let url = self.url.clone();
        let handle = tokio::spawn(async move {
            let stream = match connect_async(&url).await {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!("Connect to {url} failed: {e}");
                    let _ = events.send(LinkEvent::Failed(e.to_string()));
                    return;
                }
            };
            info!("Connected to {url}");
            if events.send(LinkEvent::Opened).is_err() {
                return;
            }
            pump(stream, out_rx, events).await;
        });
        self.tasks.push(handle.abort_handle());
    }

    /// Queue one raw text frame. Returns false when no connection is wired
    /// up or the outbound queue is full.
    pub fn send(&self, text: &str) -> bool {
        match &self.outbound {
            Some(tx) => tx.try_send(text.to_string()).is_ok(),
            None => false,
        }
    }

    /// Abort the current generation's tasks and drop the outbound queue.
    pub fn disconnect(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.outbound = None;
    }
}

impl Drop for ChatLink {
    fn drop(&mut self) {
        self.disconnect();
    }
}

/// Drive the socket until it dies: outbound sends drained from the queue,
/// inbound text frames decoded and reported, control frames ignored.
async fn pump(
    stream: WsStream,
    mut out_rx: mpsc::Receiver<String>,
    events: UnboundedSender<LinkEvent>,
) {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outgoing = out_rx.recv() => {
                let Some(text) = outgoing else { return };
                if let Err(e) = sink.send(Message::Text(text.into())).await {
                    warn!("Send failed: {e}");
                    let _ = events.send(LinkEvent::Failed(e.to_string()));
                    return;
                }
            }
            incoming = source.next() => {
                match incoming {
                    Some(Ok(Message::Text(payload))) => {
                        let decoded = decode_frame(payload.as_str());
                        if let Err(ref e) = decoded {
                            warn!("{e}");
                        }
                        if events.send(LinkEvent::Frame(decoded)).is_err() {
                            return;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Server closed the connection");
                        let _ = events.send(LinkEvent::Closed);
                        return;
                    }
                    Some(Ok(_)) => {} // ping/pong/binary
                    Some(Err(e)) => {
                        warn!("Socket error: {e}");
                        let _ = events.send(LinkEvent::Failed(e.to_string()));
                        return;
                    }
                }
            }
        }
    }
}

/// Derive the streaming endpoint from the HTTP base URL: the scheme moves to
/// its WebSocket equivalent and the fixed `/ws` path is appended.
pub fn socket_url(server_url: &str) -> String {
    let base = server_url.trim_end_matches('/');
    let upgraded = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        // Already a ws:// or wss:// address.
        base.to_string()
    };
    format!("{upgraded}/ws")
}
