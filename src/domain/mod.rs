//! Domain layer: typed variables, the variable registry and the streaming
//! state machine.
//!
//! Nothing in here performs I/O or awaits. The types are owned by a single
//! core task (see [`crate::service`]) and mutated only from there.

pub mod client_id;
pub mod stream_controller;
pub mod var_registry;
pub mod variable;

pub use client_id::ClientId;
pub use stream_controller::{
    Producer, StartOutcome, StopOutcome, StreamController, StreamHook, StreamState,
};
pub use var_registry::VariableRegistry;
pub use variable::{Limits, VarKind, VarValue, Variable, VariableDef};
