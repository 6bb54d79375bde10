//! Opaque identifier for a connected WebSocket client.

use std::fmt;

/// Identifier the transport assigns to each connection.
///
/// Wraps a UUID v4 generated on upgrade. The core never interprets it
/// beyond equality; it is only used to address replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(uuid::Uuid);

impl ClientId {
    /// Creates a new random `ClientId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The first group is enough to tell sessions apart in logs.
        let s = self.0.simple().to_string();
        f.write_str(s.get(..8).unwrap_or(&s))
    }
}
