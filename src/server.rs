use axum::{
    middleware as axum_mw,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::chart::stream;
use crate::handlers;
use crate::middleware::timing;
use crate::AppState;

/// Builds the operator-facing `Router`.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Chart ───────────────────────────────────────────────
        .route("/api/chart", get(stream::get_chart))
        .route("/api/chart/visible", get(stream::get_visible))
        .route("/api/chart/stream", get(stream::chart_stream))
        // ── Legend toggles ──────────────────────────────────────
        .route(
            "/api/series/:id/visibility",
            put(handlers::series::set_visibility),
        )
        .route(
            "/api/series/:id/toggle",
            post(handlers::series::toggle_visibility),
        )
        // ── Controller configuration ────────────────────────────
        .route(
            "/api/config",
            get(handlers::config::current_config).post(handlers::config::publish_config),
        )
        // ── Statistics ──────────────────────────────────────────
        .route("/api/reset", post(handlers::statistics::reset))
        .route("/api/status", get(handlers::statistics::status))
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(CorsLayer::permissive())
}
