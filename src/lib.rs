//! # varctl-gateway
//!
//! WebSocket gateway exposing a fixed set of typed application variables
//! (integer, float, text) for remote read and write, with an optional
//! streaming mode driven by a producer.
//!
//! Clients send JSON commands (`get`, `set`, `start_stream`, `stop_stream`,
//! `get_all_vars_config`) and receive JSON replies addressed to them only.
//! Values published by a producer are broadcast to all connected clients,
//! as are the producer's opaque binary payloads.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS connections (ws/)      REST handlers (api/)
//!     │         │                          │
//!     │         └──────── CoreHandle ──────┘
//!     │                      │  (mpsc)      ▲
//!     │                      ▼              │ SamplingProducer (sampler/)
//!     ├── core task (service/)
//!     │     ├── CommandDispatcher, Broadcaster (protocol/)
//!     │     ├── VariableRegistry, StreamController (domain/)
//!     │     └── ClientHub (transport/)
//!     │
//!     └── per-client outbound queues
//! ```
//!
//! The core task is the only owner of the registry and the stream state,
//! so neither needs a lock.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod protocol;
pub mod sampler;
pub mod server;
pub mod service;
pub mod transport;
pub mod ws;
