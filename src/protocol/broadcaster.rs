//! Fan-out of variable updates and raw producer payloads.
//!
//! Both operations may run at producer rate, so they bail out before any
//! lookup or serialization when nobody is connected.

use bytes::Bytes;

use super::messages::{Reply, ValueReply};
use crate::domain::VariableRegistry;
use crate::transport::{Frame, Transport};

/// What a broadcast call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// No client is connected; nothing was sent.
    NoClients,
    /// The payload was empty; nothing was sent.
    EmptyPayload,
    /// The variable name did not resolve; nothing was sent.
    UnknownVariable,
    /// The frame was handed to this many clients.
    Sent(usize),
}

/// Sends one frame to every client of a [`Transport`].
#[derive(Debug)]
pub struct Broadcaster<'a, T: Transport + ?Sized> {
    transport: &'a mut T,
}

impl<'a, T: Transport + ?Sized> Broadcaster<'a, T> {
    /// Wraps `transport` for the duration of one broadcast.
    #[must_use]
    pub fn new(transport: &'a mut T) -> Self {
        Self { transport }
    }

    /// Broadcasts `{variable, value}` for `name` to all clients.
    pub fn notify_variable_changed(&mut self, registry: &VariableRegistry, name: &str) -> Delivery {
        let clients = self.transport.client_count();
        if clients == 0 {
            return Delivery::NoClients;
        }
        let Some(var) = registry.by_name(name) else {
            return Delivery::UnknownVariable;
        };
        let json = Reply::Value(ValueReply::from(var)).to_json();
        self.transport.send_to_all(Frame::Text(json));
        Delivery::Sent(clients)
    }

    /// Forwards an opaque payload to all clients.
    ///
    /// `Bytes` is reference counted, so the payload is shared between
    /// clients rather than copied.
    pub fn broadcast_raw(&mut self, payload: Bytes) -> Delivery {
        let clients = self.transport.client_count();
        if clients == 0 {
            return Delivery::NoClients;
        }
        if payload.is_empty() {
            return Delivery::EmptyPayload;
        }
        self.transport.send_to_all(Frame::Binary(payload));
        Delivery::Sent(clients)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{ClientId, Variable};

    /// Transport double that records every send.
    #[derive(Debug, Default)]
    struct Recorder {
        clients: usize,
        direct: Vec<(ClientId, Frame)>,
        broadcast: Vec<Frame>,
    }

    impl Transport for Recorder {
        fn client_count(&self) -> usize {
            self.clients
        }

        fn send_to(&mut self, client: ClientId, frame: Frame) {
            self.direct.push((client, frame));
        }

        fn send_to_all(&mut self, frame: Frame) {
            self.broadcast.push(frame);
        }
    }

    fn registry() -> VariableRegistry {
        let Ok(registry) = VariableRegistry::new(vec![Variable::int("edge_count", 3)]) else {
            panic!("valid registry");
        };
        registry
    }

    #[test]
    fn notify_without_clients_sends_nothing() {
        let mut transport = Recorder::default();
        let delivery = Broadcaster::new(&mut transport).notify_variable_changed(&registry(), "edge_count");
        assert_eq!(delivery, Delivery::NoClients);
        assert!(transport.broadcast.is_empty());
        assert!(transport.direct.is_empty());
    }

    #[test]
    fn raw_without_clients_sends_nothing() {
        let mut transport = Recorder::default();
        let delivery = Broadcaster::new(&mut transport).broadcast_raw(Bytes::from_static(b"abc"));
        assert_eq!(delivery, Delivery::NoClients);
        assert!(transport.broadcast.is_empty());
    }

    #[test]
    fn notify_serializes_value() {
        let mut transport = Recorder {
            clients: 2,
            ..Recorder::default()
        };
        let delivery = Broadcaster::new(&mut transport).notify_variable_changed(&registry(), "edge_count");
        assert_eq!(delivery, Delivery::Sent(2));
        assert_eq!(
            transport.broadcast,
            vec![Frame::Text(r#"{"variable":"edge_count","value":3}"#.to_string())]
        );
    }

    #[test]
    fn notify_unknown_name_is_dropped() {
        let mut transport = Recorder {
            clients: 1,
            ..Recorder::default()
        };
        let delivery = Broadcaster::new(&mut transport).notify_variable_changed(&registry(), "nope");
        assert_eq!(delivery, Delivery::UnknownVariable);
        assert!(transport.broadcast.is_empty());
    }

    #[test]
    fn empty_payload_is_skipped() {
        let mut transport = Recorder {
            clients: 1,
            ..Recorder::default()
        };
        let delivery = Broadcaster::new(&mut transport).broadcast_raw(Bytes::new());
        assert_eq!(delivery, Delivery::EmptyPayload);
        assert!(transport.broadcast.is_empty());
    }

    #[test]
    fn raw_payload_is_forwarded() {
        let mut transport = Recorder {
            clients: 1,
            ..Recorder::default()
        };
        let payload = Bytes::from_static(&[0x10, 0x0d]);
        let delivery = Broadcaster::new(&mut transport).broadcast_raw(payload.clone());
        assert_eq!(delivery, Delivery::Sent(1));
        assert_eq!(transport.broadcast, vec![Frame::Binary(payload)]);
    }
}
