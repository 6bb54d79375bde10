//! System endpoints: landing page and health check.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// Body of `GET /`.
pub const ROOT_BANNER: &str = "Variable control server active. Connect to /ws";

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    clients: usize,
    streaming: bool,
    variables: usize,
}

/// `GET /` — Plain-text landing page.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Landing page",
    responses(
        (status = 200, description = "Server banner", body = String, content_type = "text/plain"),
    )
)]
pub async fn root_handler() -> &'static str {
    ROOT_BANNER
}

/// `GET /health` — Service health status.
///
/// # Errors
///
/// Returns [`GatewayError::CoreUnavailable`] if the control core has stopped.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, version, timestamp, connected clients and stream state.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Control core is not running", body = ErrorResponse),
    )
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, GatewayError> {
    let core = state.core.status().await?;
    Ok((
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            clients: core.clients,
            streaming: core.streaming,
            variables: core.variables,
        }),
    ))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
}
