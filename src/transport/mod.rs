//! Transport seam between the control core and connected clients.
//!
//! The core only ever talks to a [`Transport`]: it addresses replies to one
//! client and fans notifications out to all of them. Delivery is
//! fire-and-forget; no acknowledgement flows back into the core.

pub mod hub;

use bytes::Bytes;

use crate::domain::ClientId;

pub use hub::ClientHub;

/// One outbound unit of data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A JSON document.
    Text(String),
    /// An opaque producer payload.
    Binary(Bytes),
}

/// Per-client and broadcast send primitives consumed by the core.
pub trait Transport {
    /// Number of currently connected clients.
    fn client_count(&self) -> usize;

    /// Sends `frame` to a single client. Unknown clients are ignored.
    fn send_to(&mut self, client: ClientId, frame: Frame);

    /// Sends `frame` to every connected client.
    fn send_to_all(&mut self, frame: Frame);
}
