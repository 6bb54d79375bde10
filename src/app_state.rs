//! Shared application state injected into all Axum handlers.

use crate::service::CoreHandle;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Handle to the control core task.
    pub core: CoreHandle,
    /// Capacity of each client's outbound queue.
    pub client_queue_capacity: usize,
}
