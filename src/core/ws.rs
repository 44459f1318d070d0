//! Real WebSocket transport over tokio-tungstenite
//!
//! `connect` spawns a task that owns the socket: the handshake, the read
//! half, and a writer fed by an unbounded command channel. The task
//! reports lifecycle through the [`EventSink`] it was given; the returned
//! handle only queues work and never blocks.

use crate::traits::error::{ChatSocketError, Result};
use crate::traits::transport::{Connector, EventSink, TransportHandle};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, warn};

/// Connector producing real WebSocket transports
///
/// Must be used from within a tokio runtime. Handshake failures are not
/// returned from `connect`; they surface through the sink as `Error`
/// followed by `Closed`, which is what routes them into the reconnection
/// policy.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

enum WriteCommand {
    Frame(String),
    Close,
}

struct WsHandle {
    write_tx: mpsc::UnboundedSender<WriteCommand>,
}

impl Connector for WsConnector {
    fn connect(&self, url: &str, sink: EventSink) -> Result<Box<dyn TransportHandle>> {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let url = url.to_string();
        tokio::spawn(run_socket(url, sink, write_rx));
        Ok(Box::new(WsHandle { write_tx }))
    }
}

impl TransportHandle for WsHandle {
    fn send(&self, text: &str) -> Result<()> {
        self.write_tx
            .send(WriteCommand::Frame(text.to_string()))
            .map_err(|_| ChatSocketError::Transport("socket task is gone".to_string()))
    }

    fn close(&self) {
        let _ = self.write_tx.send(WriteCommand::Close);
    }
}

async fn run_socket(
    url: String,
    sink: EventSink,
    mut write_rx: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let ws_stream = match connect_async(url.as_str()).await {
        Ok((stream, _)) => stream,
        Err(e) => {
            error!("WebSocket handshake failed: {}", e);
            sink.error(e.to_string());
            sink.closed();
            return;
        }
    };

    debug!(generation = sink.generation(), "WebSocket connected");
    sink.opened();

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => sink.frame(text),
                    Some(Ok(Message::Binary(data))) => {
                        // The chat protocol is text; still, nothing inbound
                        // gets dropped on the floor.
                        sink.frame(String::from_utf8_lossy(&data).into_owned());
                    }
                    Some(Ok(Message::Ping(payload))) => {
                        if write.send(Message::Pong(payload)).await.is_err() {
                            sink.closed();
                            return;
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "Server closed the connection");
                        sink.closed();
                        return;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("WebSocket error: {}", e);
                        sink.error(e.to_string());
                        sink.closed();
                        return;
                    }
                    None => {
                        warn!("WebSocket stream ended");
                        sink.closed();
                        return;
                    }
                }
            }
            cmd = write_rx.recv() => {
                match cmd {
                    Some(WriteCommand::Frame(text)) => {
                        if let Err(e) = write.send(Message::Text(text)).await {
                            error!("WebSocket write failed: {}", e);
                            sink.error(e.to_string());
                            sink.closed();
                            return;
                        }
                    }
                    // A dropped handle counts as a close request.
                    Some(WriteCommand::Close) | None => {
                        let _ = write.close().await;
                        sink.closed();
                        return;
                    }
                }
            }
        }
    }
}
