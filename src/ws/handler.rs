//! `/ws` upgrade endpoint.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::Response;

use super::connection::run_connection;
use crate::app_state::AppState;

/// Largest inbound message accepted. Commands are small JSON documents.
const MAX_COMMAND_SIZE: usize = 64 * 1024;

/// `GET /ws` — Upgrade to the variable control protocol.
///
/// Each upgraded socket becomes one client of the control core, with an
/// outbound queue of `client_queue_capacity` frames.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let AppState {
        core,
        client_queue_capacity,
    } = state;
    ws.max_message_size(MAX_COMMAND_SIZE)
        .on_upgrade(move |socket| run_connection(socket, core, client_queue_capacity))
}
