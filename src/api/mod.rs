//! REST API layer: route handlers and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints live at
//! the root. With the `swagger-ui` feature the OpenAPI document is served
//! at `/api-docs/openapi.json` and browsable at `/swagger-ui`.

pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};
use crate::protocol::VarConfigEntry;

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "varctl-gateway",
        description = "Typed variable control over WebSocket, with read-only REST views."
    ),
    paths(
        handlers::system::root_handler,
        handlers::system::health_handler,
        handlers::variables::list_variables,
        handlers::variables::get_variable,
    ),
    components(schemas(
        VarConfigEntry,
        ErrorResponse,
        ErrorBody,
        handlers::system::HealthResponse,
    )),
    tags(
        (name = "System", description = "Liveness and status"),
        (name = "Variables", description = "Registry snapshots"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
