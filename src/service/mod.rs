//! Service layer: the control context and the task that owns it.
//!
//! [`ControlService`] holds the registry and the stream controller.
//! [`run_core`] drives it from a single task fed by [`CoreHandle`]s.

pub mod control_service;
pub mod core;
pub mod core_handle;

pub use control_service::{ControlService, CoreStatus};
pub use core::{CoreEvent, run_core};
pub use core_handle::CoreHandle;
