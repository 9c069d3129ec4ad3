//! # KKT API
//!
//! HTTP server in front of the fiscal register.
//!
//! ```text
//! client ──► HTTP (8000) ──► kkt-api ──► DeviceSession ──► register
//! ```

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use kkt_api::{build_app, init_tracing, ApiConfig, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::load(None).context("Failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        driver = %config.device.driver,
        connection = %config.device.connection,
        "Starting KKT API server..."
    );

    let bind_addr = config.server.bind_address();
    let connect_on_startup = config.device.connect_on_startup;
    let state = AppState::new(config).into_shared();

    if connect_on_startup {
        let worker = Arc::clone(&state);
        let result = tokio::task::spawn_blocking(move || {
            let descriptor = worker.config().device.connection.clone();
            worker.session().connect(descriptor)
        })
        .await
        .context("Startup connect task failed")?;

        match result {
            Ok(()) => info!("Connected to the fiscal register"),
            Err(e) => warn!(error = %e, "Startup connect failed, continuing disconnected"),
        }
    }

    let app = build_app(Arc::clone(&state));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    info!(addr = %bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    // The register keeps its own state; only the driver handle is released
    let session = Arc::clone(state.session());
    tokio::task::spawn_blocking(move || session.disconnect())
        .await
        .context("Shutdown disconnect task failed")?
        .context("Disconnect failed")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
