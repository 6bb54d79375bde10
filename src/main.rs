//! varctl-gateway server entry point.
//!
//! Starts the control core and the Axum HTTP server with REST and
//! WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use varctl_gateway::config::GatewayConfig;
use varctl_gateway::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting varctl-gateway");

    // Build and start the control core
    let variables = config.load_variables()?;
    let core = server::start_core(&config, variables)?;

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, &config, core, shutdown_signal()).await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
}
