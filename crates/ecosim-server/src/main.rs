//! HTTP server exposing the ecosystem simulation.

mod api;
mod telemetry;

use anyhow::Result;
use ecosim_core::{EcosystemConfig, ServerConfig};
use ecosim_world::{ChaChaRandom, Simulation};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize telemetry
    telemetry::init_telemetry(config.otel_endpoint.as_deref())?;

    info!("Starting Ecosim server on {}:{}", config.bind_address, config.port);

    let rng = match config.seed {
        Some(seed) => {
            info!(seed, "Using fixed seed");
            ChaChaRandom::from_seed(seed)
        }
        None => ChaChaRandom::from_entropy(),
    };
    let simulation = Simulation::new(EcosystemConfig::default(), Box::new(rng))?;

    let app = api::router(api::AppState::new(simulation), &config.static_dir);

    // Start server
    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Shutdown telemetry
    telemetry::shutdown_telemetry();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
