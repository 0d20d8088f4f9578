use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use configs::AppConfig;
use service::{metrics, waitlist::WaitlistStore};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

/// Open the store and assemble the router. Fails when the persisted
/// waitlist cannot be read, so the server never runs on a blank slate by
/// accident.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<(Router, Arc<WaitlistStore>)> {
    common::env::ensure_env(&config.storage.static_dir, &config.storage.data_dir()).await?;
    metrics::register_all();

    let store = WaitlistStore::open(&config.storage.data_file)
        .await
        .with_context(|| format!("failed to initialize store at {}", config.storage.data_file.display()))?;

    let state = ServerState::new(Arc::clone(&store));
    let app = routes::build_router(state, build_cors(), &config.storage.static_dir);
    Ok((app, store))
}

/// Public entry: build the app and run the HTTP server until Ctrl+C,
/// then write a final snapshot.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let (app, store) = build_app(&config).await?;

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot bind {addr}"))?;
    info!(%addr, "waitlist server listening");
    info!("  GET  /              - landing page");
    info!("  POST /waitlist      - join waitlist");
    info!("  GET  /admin         - view waitlist");
    info!("  GET  /health        - health check");
    info!("  GET  /metrics       - prometheus metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = store.flush().await {
        error!(error = %e, "final waitlist snapshot failed");
    }
    Ok(())
}
