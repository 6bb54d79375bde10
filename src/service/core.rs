//! The core task: single owner of all control state.
//!
//! WebSocket connections, REST handlers and producer tasks never touch the
//! [`ControlService`] directly. They send [`CoreEvent`]s through a
//! [`super::CoreHandle`], and [`run_core`] applies them strictly one at a
//! time. This is what keeps the registry and the stream state machine
//! lock-free.

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};

use super::control_service::{ControlService, CoreStatus};
use crate::domain::{ClientId, VarValue};
use crate::protocol::{Delivery, VarConfigEntry};
use crate::transport::{ClientHub, Frame, Transport};

/// Input of the core task.
#[derive(Debug)]
pub enum CoreEvent {
    /// A client connected; frames for it go to `queue`.
    Connected {
        /// Transport-assigned identifier.
        client: ClientId,
        /// Outbound queue drained by the connection task.
        queue: mpsc::Sender<Frame>,
    },
    /// A client went away.
    Disconnected {
        /// Identifier of the departed client.
        client: ClientId,
    },
    /// A text frame arrived from a client.
    Message {
        /// Sender.
        client: ClientId,
        /// Raw frame contents.
        payload: String,
    },
    /// A producer reports a new value for a variable. Dropped while the
    /// stream is idle.
    Publish {
        /// Variable name.
        name: String,
        /// New value.
        value: VarValue,
    },
    /// A producer payload for all clients. Dropped while the stream is
    /// idle.
    BroadcastRaw(Bytes),
    /// Request for the full configuration listing.
    Snapshot(oneshot::Sender<Vec<VarConfigEntry>>),
    /// Request for one configuration entry.
    Variable {
        /// Variable name.
        name: String,
        /// Reply channel.
        reply: oneshot::Sender<Option<VarConfigEntry>>,
    },
    /// Request for a status summary.
    Status(oneshot::Sender<CoreStatus>),
}

/// Runs the core until every [`super::CoreHandle`] is dropped.
pub async fn run_core(
    mut service: ControlService,
    mut hub: ClientHub,
    mut events: mpsc::Receiver<CoreEvent>,
) {
    tracing::info!(variables = service.registry().len(), "control core running");
    while let Some(event) = events.recv().await {
        handle_event(&mut service, &mut hub, event);
    }
    tracing::info!("control core stopped");
}

/// Applies one event. Never blocks or awaits.
pub fn handle_event(service: &mut ControlService, hub: &mut ClientHub, event: CoreEvent) {
    match event {
        CoreEvent::Connected { client, queue } => hub.connect(client, queue),
        CoreEvent::Disconnected { client } => {
            hub.disconnect(client);
            if hub.client_count() == 0 && service.client_count_reached_zero() {
                tracing::info!("stream auto-stopped, no clients left");
            }
        }
        CoreEvent::Message { client, payload } => {
            tracing::debug!(%client, %payload, "received");
            service.handle_message(client, payload.as_bytes(), hub);
        }
        // A stopped producer may still have output queued behind the stop
        // request; nothing from it goes out after the stop reply.
        CoreEvent::Publish { name, .. } if !service.stream().is_streaming() => {
            tracing::debug!(%name, "publish dropped, stream idle");
        }
        CoreEvent::BroadcastRaw(payload) if !service.stream().is_streaming() => {
            tracing::debug!(len = payload.len(), "payload dropped, stream idle");
        }
        CoreEvent::Publish { name, value } => match service.publish(&name, value, hub) {
            Ok(Delivery::UnknownVariable) => {
                tracing::warn!(%name, "publish for unknown variable dropped");
            }
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "publish rejected"),
        },
        CoreEvent::BroadcastRaw(payload) => {
            service.broadcast_raw(payload, hub);
        }
        CoreEvent::Snapshot(reply) => {
            let _ = reply.send(service.snapshot());
        }
        CoreEvent::Variable { name, reply } => {
            let _ = reply.send(service.variable(&name));
        }
        CoreEvent::Status(reply) => {
            let _ = reply.send(service.status(hub.client_count()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{Variable, VariableRegistry};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn make_service() -> (ControlService, Arc<AtomicUsize>) {
        let Ok(registry) = VariableRegistry::new(vec![Variable::int("edge_count", 0)]) else {
            panic!("valid registry");
        };
        let mut service = ControlService::new(registry);
        let stops = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&stops);
        service.stream_mut().register_callbacks(
            Some(Box::new(|| {})),
            Some(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );
        (service, stops)
    }

    fn connect(service: &mut ControlService, hub: &mut ClientHub) -> (ClientId, mpsc::Receiver<Frame>) {
        let client = ClientId::new();
        let (queue, rx) = mpsc::channel(16);
        handle_event(service, hub, CoreEvent::Connected { client, queue });
        (client, rx)
    }

    fn message(client: ClientId, payload: &str) -> CoreEvent {
        CoreEvent::Message {
            client,
            payload: payload.to_string(),
        }
    }

    #[test]
    fn last_disconnect_auto_stops_stream() {
        let (mut service, stops) = make_service();
        let mut hub = ClientHub::new();
        let (a, _rx_a) = connect(&mut service, &mut hub);
        let (b, _rx_b) = connect(&mut service, &mut hub);

        handle_event(&mut service, &mut hub, message(a, r#"{"action":"start_stream"}"#));
        assert!(service.stream().is_streaming());

        handle_event(&mut service, &mut hub, CoreEvent::Disconnected { client: a });
        assert!(service.stream().is_streaming());
        assert_eq!(stops.load(Ordering::SeqCst), 0);

        handle_event(&mut service, &mut hub, CoreEvent::Disconnected { client: b });
        assert!(!service.stream().is_streaming());
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    fn publish(value: i64) -> CoreEvent {
        CoreEvent::Publish {
            name: "edge_count".to_string(),
            value: VarValue::Int(value),
        }
    }

    #[test]
    fn publish_reaches_every_client() {
        let (mut service, _) = make_service();
        let mut hub = ClientHub::new();
        let (a, mut rx_a) = connect(&mut service, &mut hub);
        let (_, mut rx_b) = connect(&mut service, &mut hub);
        handle_event(&mut service, &mut hub, message(a, r#"{"action":"start_stream"}"#));
        assert!(rx_a.try_recv().is_ok());

        handle_event(&mut service, &mut hub, publish(9));
        let expected = Frame::Text(r#"{"variable":"edge_count","value":9}"#.to_string());
        assert_eq!(rx_a.try_recv().ok(), Some(expected.clone()));
        assert_eq!(rx_b.try_recv().ok(), Some(expected));
    }

    #[test]
    fn producer_output_after_stop_is_dropped() {
        let (mut service, _) = make_service();
        let mut hub = ClientHub::new();
        let (a, mut rx) = connect(&mut service, &mut hub);

        handle_event(&mut service, &mut hub, message(a, r#"{"action":"start_stream"}"#));
        handle_event(&mut service, &mut hub, CoreEvent::BroadcastRaw(Bytes::from_static(&[1, 0])));
        handle_event(&mut service, &mut hub, message(a, r#"{"action":"stop_stream"}"#));
        // Queued by the producer before it was stopped.
        handle_event(&mut service, &mut hub, CoreEvent::BroadcastRaw(Bytes::from_static(&[2, 0])));
        handle_event(&mut service, &mut hub, publish(5));

        let frames: Vec<Frame> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(
            frames,
            vec![
                Frame::Text(r#"{"status":"ok","message":"Stream started."}"#.to_string()),
                Frame::Binary(Bytes::from_static(&[1, 0])),
                Frame::Text(r#"{"status":"ok","message":"Stream stopped."}"#.to_string()),
            ]
        );
        assert_eq!(
            service.variable("edge_count").map(|e| e.value),
            Some(VarValue::Int(0))
        );
    }

    #[test]
    fn status_counts_clients() {
        let (mut service, _) = make_service();
        let mut hub = ClientHub::new();
        let _conn = connect(&mut service, &mut hub);
        let (tx, mut rx) = oneshot::channel();
        handle_event(&mut service, &mut hub, CoreEvent::Status(tx));
        let Ok(status) = rx.try_recv() else {
            panic!("status reply expected");
        };
        assert_eq!(status.clients, 1);
        assert!(!status.streaming);
    }

    #[tokio::test]
    async fn core_stops_when_handles_drop() {
        let (service, _) = make_service();
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(run_core(service, ClientHub::new(), rx));
        drop(tx);
        assert!(task.await.is_ok());
    }
}
