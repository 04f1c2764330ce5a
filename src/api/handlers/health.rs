use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::AppState;

/// Healthy once the first scan has completed.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.read().await.as_ref() {
        Some(snapshot) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "generated_at": snapshot.meta.generated_at,
                "active": snapshot.active.len(),
                "inactive": snapshot.inactive.len(),
            })),
        ),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        ),
    }
}
