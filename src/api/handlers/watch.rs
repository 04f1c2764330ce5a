use axum::extract::{Path, State};
use axum::Json;
use metrics::gauge;
use serde::Deserialize;

use crate::errors::AppError;
use crate::hyperliquid::normalize_address;
use crate::AppState;

use super::wallets::ApiResponse;

#[derive(Deserialize)]
pub struct WatchRequest {
    pub address: String,
}

fn parse_address(raw: &str) -> Result<String, AppError> {
    normalize_address(raw).ok_or_else(|| AppError::BadRequest(format!("invalid address: {raw}")))
}

/// GET /api/watch
pub async fn list(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    let watched = state.watchlist.read().await.iter().cloned().collect();
    Json(ApiResponse {
        success: true,
        data: Some(watched),
        error: None,
    })
}

/// POST /api/watch
pub async fn add(
    State(state): State<AppState>,
    Json(req): Json<WatchRequest>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let address = parse_address(&req.address)?;

    let mut watchlist = state.watchlist.write().await;
    if watchlist.insert(address.clone()) {
        tracing::info!(wallet = %address, "Wallet added to watch list");
    }
    gauge!("watched_wallets").set(watchlist.len() as f64);

    Ok(Json(ApiResponse {
        success: true,
        data: Some(watchlist.iter().cloned().collect()),
        error: None,
    }))
}

/// DELETE /api/watch/{address}
pub async fn remove(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<Vec<String>>>, AppError> {
    let address = parse_address(&address)?;

    let mut watchlist = state.watchlist.write().await;
    if !watchlist.remove(&address) {
        return Err(AppError::NotFound(format!("{address} is not watched")));
    }
    gauge!("watched_wallets").set(watchlist.len() as f64);
    tracing::info!(wallet = %address, "Wallet removed from watch list");

    Ok(Json(ApiResponse {
        success: true,
        data: Some(watchlist.iter().cloned().collect()),
        error: None,
    }))
}
