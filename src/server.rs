//! Process wiring: core task, producer binding and HTTP router.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::GatewayConfig;
use crate::domain::{Variable, VariableRegistry};
use crate::sampler::{SamplingProducer, SyntheticSource};
use crate::service::{ControlService, CoreHandle, run_core};
use crate::transport::ClientHub;
use crate::ws::handler::ws_handler;

/// Builds the registry and spawns the core task.
///
/// When streaming is enabled a [`SamplingProducer`] over a
/// [`SyntheticSource`] is bound to the stream controller; otherwise
/// `start_stream` and `stop_stream` answer "not configured".
///
/// Must be called from within a Tokio runtime.
///
/// # Errors
///
/// Returns an error if `variables` is empty.
pub fn start_core(config: &GatewayConfig, variables: Vec<Variable>) -> anyhow::Result<CoreHandle> {
    let registry = VariableRegistry::new(variables)?;
    let (core, events) = CoreHandle::channel(config.core_channel_capacity);

    let mut service = ControlService::new(registry);
    if config.streaming_enabled {
        service.stream_mut().register_producer(SamplingProducer::new(
            core.clone(),
            SyntheticSource::default(),
            config.sampler_config(),
        ));
    } else {
        tracing::info!("streaming disabled");
    }

    tokio::spawn(run_core(service, ClientHub::new(), events));
    Ok(core)
}

/// Builds the HTTP application: REST routes, `/ws`, tracing and CORS.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the gateway on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve(
    listener: TcpListener,
    config: &GatewayConfig,
    core: CoreHandle,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_app(AppState {
        core,
        client_queue_capacity: config.client_queue_capacity,
    });
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
