use std::path::Path;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use common::types::Health;
use service::metrics;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::ServerState;

pub mod admin;
pub mod waitlist;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn metrics_text() -> (StatusCode, String) {
    match metrics::encode_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

/// Build the application router: signup API, admin listing, health,
/// metrics, and static assets for every other path.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: &Path) -> Router {
    let static_files = ServeDir::new(static_dir);

    Router::new()
        .route("/waitlist", post(waitlist::join_waitlist))
        .route("/admin", get(admin::view_waitlist))
        .route("/health", get(health))
        .route("/metrics", get(metrics_text))
        .fallback_service(static_files)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
