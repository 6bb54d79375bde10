//! Registry of connected clients and their outbound queues.
//!
//! Each WebSocket connection registers a bounded queue with the hub. The
//! hub is owned by the core task and implements [`Transport`] on top of
//! those queues with non-blocking `try_send`.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{Frame, Transport};
use crate::domain::ClientId;

/// Outbound queues of all connected clients.
#[derive(Debug, Default)]
pub struct ClientHub {
    clients: HashMap<ClientId, mpsc::Sender<Frame>>,
}

impl ClientHub {
    /// Creates an empty hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the outbound queue of a newly connected client.
    pub fn connect(&mut self, client: ClientId, queue: mpsc::Sender<Frame>) {
        self.clients.insert(client, queue);
        tracing::info!(%client, clients = self.clients.len(), "client connected");
    }

    /// Removes a client. Returns `true` if it was connected.
    pub fn disconnect(&mut self, client: ClientId) -> bool {
        let removed = self.clients.remove(&client).is_some();
        if removed {
            tracing::info!(%client, clients = self.clients.len(), "client disconnected");
        }
        removed
    }

    /// Returns `true` if `client` is connected.
    #[must_use]
    pub fn contains(&self, client: ClientId) -> bool {
        self.clients.contains_key(&client)
    }

    /// Pushes `frame` onto one queue. Returns `false` if the receiver is gone.
    fn push(client: ClientId, queue: &mpsc::Sender<Frame>, frame: Frame) -> bool {
        match queue.try_send(frame) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(%client, "outbound queue full, dropping frame");
                true
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

impl Transport for ClientHub {
    fn client_count(&self) -> usize {
        self.clients.len()
    }

    fn send_to(&mut self, client: ClientId, frame: Frame) {
        let Some(queue) = self.clients.get(&client) else {
            tracing::debug!(%client, "reply for unknown client dropped");
            return;
        };
        if !Self::push(client, queue, frame) {
            self.disconnect(client);
        }
    }

    fn send_to_all(&mut self, frame: Frame) {
        let mut closed = Vec::new();
        for (client, queue) in &self.clients {
            if !Self::push(*client, queue, frame.clone()) {
                closed.push(*client);
            }
        }
        for client in closed {
            self.disconnect(client);
        }
    }
}
