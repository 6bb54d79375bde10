//! Read-only views of the variable registry.
//!
//! Writes go through the WebSocket protocol only, so that every change is
//! validated and broadcast by the core.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};
use crate::protocol::VarConfigEntry;

/// `GET /variables` — Configuration of every variable, in registry order.
///
/// # Errors
///
/// Returns [`GatewayError::CoreUnavailable`] if the control core has stopped.
#[utoipa::path(
    get,
    path = "/api/v1/variables",
    tag = "Variables",
    summary = "List variables",
    description = "Returns name, type, current value and limits of every variable, in definition order.",
    responses(
        (status = 200, description = "Variable list", body = Vec<VarConfigEntry>),
        (status = 503, description = "Control core is not running", body = ErrorResponse),
    )
)]
pub async fn list_variables(
    State(state): State<AppState>,
) -> Result<Json<Vec<VarConfigEntry>>, GatewayError> {
    Ok(Json(state.core.snapshot().await?))
}

/// `GET /variables/{name}` — Configuration of one variable.
///
/// # Errors
///
/// Returns [`GatewayError::VariableNotFound`] for an unknown name.
#[utoipa::path(
    get,
    path = "/api/v1/variables/{name}",
    tag = "Variables",
    summary = "Get variable",
    params(("name" = String, Path, description = "Variable name (case-sensitive)")),
    responses(
        (status = 200, description = "Variable found", body = VarConfigEntry),
        (status = 404, description = "Variable not found", body = ErrorResponse),
        (status = 503, description = "Control core is not running", body = ErrorResponse),
    )
)]
pub async fn get_variable(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<VarConfigEntry>, GatewayError> {
    Ok(Json(state.core.variable(&name).await?))
}

/// Variable routes, nested under `/api/v1` by the caller.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/variables", get(list_variables))
        .route("/variables/{name}", get(get_variable))
}
