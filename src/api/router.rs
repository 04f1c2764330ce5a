use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    let api = Router::new()
        // Rankings
        .route("/api/wallets", get(handlers::wallets::list))
        .route("/api/wallets/:address", get(handlers::wallets::detail))
        .route("/api/meta", get(handlers::wallets::meta))
        // Watched subset
        .route("/api/watch", get(handlers::watch::list).post(handlers::watch::add))
        .route("/api/watch/:address", delete(handlers::watch::remove))
        // Live refresh
        .route("/api/refresh", post(handlers::refresh::trigger));

    // Read-only dashboards fetch this directly from the browser
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
