use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, invoke, middleware::metrics_middleware};
use crate::state::AppState;

/// Largest trigger body accepted. A queue batch holds up to 10 messages of
/// 256 KiB each, and JSON escaping can inflate that several times over.
pub const TRIGGER_BODY_LIMIT: usize = 32 * 1024 * 1024;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Queue triggers
        .route(
            "/receiver",
            post(invoke::receiver).layer(DefaultBodyLimit::max(TRIGGER_BODY_LIMIT)),
        )
        .route(
            "/downloader",
            post(invoke::downloader).layer(DefaultBodyLimit::max(TRIGGER_BODY_LIMIT)),
        )
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
