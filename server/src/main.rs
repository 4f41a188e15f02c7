//! Open Platform Push Relay - Main Entry Point

use anyhow::Result;
use std::time::Duration;
use tracing::info;

use op_server::{api, config, openplatform::forward};

/// How long in-flight forwards may run after the listener stops. Covers one
/// delivery's full retry schedule (3 attempts x 10s timeout + 6s backoff).
const SHUTDOWN_GRACE: Duration = Duration::from_secs(40);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "op_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        component_app_id = %config.component_app_id,
        "Starting Open Platform Relay"
    );

    // Start forwarding worker (optional)
    let (forwarder, worker) = match config.forward_url.clone() {
        Some(url) => {
            let client = forward::http_client()?;
            let (forwarder, rx) = forward::Forwarder::channel(config.forward_queue_size);
            let worker = tokio::spawn(forward::spawn_forward_worker(
                rx,
                client,
                url,
                config.forward_queue_size,
            ));
            (Some(forwarder), Some(worker))
        }
        None => {
            info!("FORWARD_URL not set, event forwarding disabled");
            (None, None)
        }
    };

    // Build application state and router
    let state = api::AppState::new(config.clone(), forwarder);
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install CTRL+C signal handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // The router (and with it every Forwarder) is gone; let the worker drain.
    if let Some(worker) = worker {
        if tokio::time::timeout(SHUTDOWN_GRACE, worker).await.is_err() {
            tracing::warn!("Forwarding worker did not drain before shutdown");
        }
    }

    info!("Server shutdown complete");

    Ok(())
}
