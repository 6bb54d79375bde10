//! WebSocket transport: upgrade handler and per-connection loop.
//!
//! The endpoint at `/ws` carries the JSON command protocol in text frames
//! and producer output in binary frames.

pub mod connection;
pub mod handler;
