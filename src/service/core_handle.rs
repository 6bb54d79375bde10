//! Cloneable handle to the core task.
//!
//! [`CoreHandle`] wraps the sending half of the core's event queue. Every
//! WebSocket connection, REST handler and producer task holds a clone.

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use super::control_service::CoreStatus;
use super::core::CoreEvent;
use crate::domain::{ClientId, VarValue};
use crate::error::GatewayError;
use crate::protocol::VarConfigEntry;
use crate::transport::Frame;

/// Sender side of the core's event queue.
#[derive(Debug, Clone)]
pub struct CoreHandle {
    sender: mpsc::Sender<CoreEvent>,
}

impl CoreHandle {
    /// Creates a handle and the receiver to pass to
    /// [`super::core::run_core`].
    #[must_use]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CoreEvent>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    async fn send(&self, event: CoreEvent) -> Result<(), GatewayError> {
        self.sender
            .send(event)
            .await
            .map_err(|_| GatewayError::CoreUnavailable)
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> CoreEvent,
    ) -> Result<T, GatewayError> {
        let (tx, rx) = oneshot::channel();
        self.send(build(tx)).await?;
        rx.await.map_err(|_| GatewayError::CoreUnavailable)
    }

    /// Registers a new client and its outbound queue.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn connect(&self, client: ClientId, queue: mpsc::Sender<Frame>) -> Result<(), GatewayError> {
        self.send(CoreEvent::Connected { client, queue }).await
    }

    /// Deregisters a client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn disconnect(&self, client: ClientId) -> Result<(), GatewayError> {
        self.send(CoreEvent::Disconnected { client }).await
    }

    /// Hands an inbound text frame to the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn deliver(&self, client: ClientId, payload: String) -> Result<(), GatewayError> {
        self.send(CoreEvent::Message { client, payload }).await
    }

    /// Writes a producer value and broadcasts it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn publish(&self, name: impl Into<String>, value: VarValue) -> Result<(), GatewayError> {
        self.send(CoreEvent::Publish {
            name: name.into(),
            value,
        })
        .await
    }

    /// Broadcasts a producer payload to all clients.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn broadcast_raw(&self, payload: Bytes) -> Result<(), GatewayError> {
        self.send(CoreEvent::BroadcastRaw(payload)).await
    }

    /// Returns the configuration listing of all variables.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn snapshot(&self) -> Result<Vec<VarConfigEntry>, GatewayError> {
        self.request(CoreEvent::Snapshot).await
    }

    /// Returns the configuration entry of one variable.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::VariableNotFound`] for an unknown name, or
    /// [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn variable(&self, name: &str) -> Result<VarConfigEntry, GatewayError> {
        let owned = name.to_string();
        self.request(|reply| CoreEvent::Variable { name: owned, reply })
            .await?
            .ok_or_else(|| GatewayError::VariableNotFound(name.to_string()))
    }

    /// Returns a status summary of the core.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::CoreUnavailable`] if the core has stopped.
    pub async fn status(&self) -> Result<CoreStatus, GatewayError> {
        self.request(CoreEvent::Status).await
    }
}
