use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::services::live_refresh::{refresh_watched, RefreshOutcome};
use crate::AppState;

use super::wallets::ApiResponse;

#[derive(Serialize)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
}

/// POST /api/refresh: run one live refresh of the watched wallets now
pub async fn trigger(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RefreshSummary>>, AppError> {
    let outcome = refresh_watched(
        &state.info_client,
        &state.store,
        &state.watchlist,
        &state.refresh_guard,
    )
    .await?;

    match outcome {
        RefreshOutcome::Skipped => Err(AppError::Conflict("a refresh is already in flight".into())),
        RefreshOutcome::Completed { refreshed, failed } => {
            tracing::info!(refreshed, failed, "Live refresh triggered via API");
            Ok(Json(ApiResponse {
                success: true,
                data: Some(RefreshSummary { refreshed, failed }),
                error: None,
            }))
        }
    }
}
