//! Per-connection read/write loop.
//!
//! Forwards inbound text frames to the core and drains the connection's
//! outbound queue onto the socket.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::ClientId;
use crate::service::CoreHandle;
use crate::transport::Frame;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers a fresh [`ClientId`] and outbound queue with the core.
/// - Text frames are handed to the dispatcher; binary frames are ignored.
/// - Frames queued by the core are written to the socket.
/// - On exit the client is deregistered, which may auto-stop the stream.
pub async fn run_connection(socket: WebSocket, core: CoreHandle, queue_capacity: usize) {
    let client = ClientId::new();
    let (queue, mut outbound) = mpsc::channel::<Frame>(queue_capacity);
    if core.connect(client, queue).await.is_err() {
        tracing::warn!(%client, "control core unavailable, dropping connection");
        return;
    }

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if core.deliver(client, text.as_str().to_owned()).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(data))) => {
                        tracing::debug!(%client, len = data.len(), "binary frame ignored");
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%client, error = %e, "ws receive error");
                        break;
                    }
                }
            }
            // Frame queued by the core
            frame = outbound.recv() => {
                let Some(frame) = frame else {
                    break;
                };
                if ws_tx.send(into_message(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    let _ = core.disconnect(client).await;
    tracing::debug!(%client, "ws connection closed");
}

fn into_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(json) => Message::text(json),
        Frame::Binary(payload) => Message::Binary(payload),
    }
}
