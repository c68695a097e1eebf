pub mod routes;
pub mod view;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

/// JSON API under /api, static dashboard files as the fallback.
pub fn build_router(state: Arc<AppState>) -> Router {
    let dashboard = state.config.dashboard_dir.clone();

    Router::new()
        .route("/api/health", get(routes::get_health))
        .route("/api/view", get(routes::get_view))
        .route("/api/calendar", get(routes::get_calendar))
        .route("/api/calendar/export", get(routes::get_calendar_export))
        .route("/api/price/barrier", post(routes::post_price_barrier))
        .route("/api/price/binary", post(routes::post_price_binary))
        .route("/api/counters", get(routes::get_counters))
        .fallback_service(
            tower_http::services::ServeDir::new(&dashboard)
                .fallback(tower_http::services::ServeFile::new(dashboard.join("index.html"))),
        )
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
