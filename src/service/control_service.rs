//! Control service: the owned context object behind the WebSocket protocol.

use bytes::Bytes;

use crate::domain::{ClientId, StreamController, VarValue, VariableRegistry};
use crate::error::VarError;
use crate::protocol::messages::config_entries;
use crate::protocol::{Broadcaster, CommandDispatcher, Delivery, VarConfigEntry};
use crate::transport::{Frame, Transport};

/// Point-in-time summary of the core for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreStatus {
    /// Connected clients.
    pub clients: usize,
    /// Whether the producer is running.
    pub streaming: bool,
    /// Registered variables.
    pub variables: usize,
}

/// Owns the variable registry and the stream controller.
///
/// Every method runs to completion without awaiting, and the service is
/// driven from one task only (see [`super::core::run_core`]), so no
/// locking is needed.
#[derive(Debug)]
pub struct ControlService {
    registry: VariableRegistry,
    stream: StreamController,
}

impl ControlService {
    /// Creates a service with an idle, unbound stream controller.
    #[must_use]
    pub fn new(registry: VariableRegistry) -> Self {
        Self {
            registry,
            stream: StreamController::new(),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    /// Returns the stream controller, for binding producers at setup.
    pub fn stream_mut(&mut self) -> &mut StreamController {
        &mut self.stream
    }

    /// Returns the stream controller.
    #[must_use]
    pub fn stream(&self) -> &StreamController {
        &self.stream
    }

    /// Dispatches one inbound frame and replies to its sender.
    pub fn handle_message<T: Transport + ?Sized>(
        &mut self,
        client: ClientId,
        raw: &[u8],
        transport: &mut T,
    ) {
        let reply = CommandDispatcher::new(&mut self.registry, &mut self.stream).dispatch(raw);
        tracing::debug!(%client, status = ?reply.status_kind(), "reply");
        transport.send_to(client, Frame::Text(reply.to_json()));
    }

    /// Hook for the transport when its client count drops to zero.
    ///
    /// Returns `true` if the stream was auto-stopped.
    pub fn client_count_reached_zero(&mut self) -> bool {
        self.stream.notify_last_client_disconnected()
    }

    /// Broadcasts the current value of `name` to all clients.
    pub fn notify_variable_changed<T: Transport + ?Sized>(
        &self,
        name: &str,
        transport: &mut T,
    ) -> Delivery {
        Broadcaster::new(transport).notify_variable_changed(&self.registry, name)
    }

    /// Broadcasts an opaque producer payload to all clients.
    pub fn broadcast_raw<T: Transport + ?Sized>(&self, payload: Bytes, transport: &mut T) -> Delivery {
        Broadcaster::new(transport).broadcast_raw(payload)
    }

    /// Producer feedback path: writes `value` into `name`, then broadcasts
    /// the new value.
    ///
    /// An unknown name is not an error; it is reported as
    /// [`Delivery::UnknownVariable`].
    ///
    /// # Errors
    ///
    /// Returns the [`VarError`] if the value fails validation.
    pub fn publish<T: Transport + ?Sized>(
        &mut self,
        name: &str,
        value: VarValue,
        transport: &mut T,
    ) -> Result<Delivery, VarError> {
        let Some(index) = self.registry.find(name) else {
            return Ok(Delivery::UnknownVariable);
        };
        self.registry.set(index, value)?;
        Ok(self.notify_variable_changed(name, transport))
    }

    /// Returns the configuration listing of all variables.
    #[must_use]
    pub fn snapshot(&self) -> Vec<VarConfigEntry> {
        config_entries(&self.registry)
    }

    /// Returns the configuration entry for `name`.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<VarConfigEntry> {
        self.registry.by_name(name).map(VarConfigEntry::from)
    }

    /// Summarises the service for the given client count.
    #[must_use]
    pub fn status(&self, clients: usize) -> CoreStatus {
        CoreStatus {
            clients,
            streaming: self.stream.is_streaming(),
            variables: self.registry.len(),
        }
    }
}
