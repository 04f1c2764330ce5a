use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::intelligence::{rank_wallets, RankBy};
use crate::models::{ActivityMode, ScanMeta, WalletView};
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub mode: Option<String>,
    pub rank_by: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct WalletList {
    pub mode: ActivityMode,
    pub rank_by: RankBy,
    pub generated_at: DateTime<Utc>,
    pub wallets: Vec<WalletView>,
}

#[derive(Serialize)]
pub struct WalletDetail {
    pub mode: ActivityMode,
    #[serde(flatten)]
    pub wallet: WalletView,
}

#[derive(Serialize)]
pub struct MetaSummary {
    #[serde(flatten)]
    pub meta: ScanMeta,
    pub default_rank_by: RankBy,
    pub active: usize,
    pub inactive: usize,
    pub watched: usize,
}

fn not_ready() -> AppError {
    AppError::Unavailable("no scan has completed yet".into())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/wallets?mode=&rank_by=&limit=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<WalletList>>, AppError> {
    let mode = match query.mode.as_deref() {
        None => ActivityMode::Active,
        Some(raw) => ActivityMode::from_str(raw)
            .ok_or_else(|| AppError::BadRequest(format!("unknown mode: {raw}")))?,
    };
    let rank_by = match query.rank_by.as_deref() {
        None => state.config.default_rank_by,
        Some(raw) => raw.parse::<RankBy>()?,
    };

    let store = state.store.read().await;
    let snapshot = store.as_ref().ok_or_else(not_ready)?;

    // Stored halves are already ranked under the default criterion
    let wallets = snapshot.wallets(mode).to_vec();
    let mut wallets = if rank_by == state.config.default_rank_by {
        wallets
    } else {
        rank_wallets(wallets, rank_by)
    };
    if let Some(limit) = query.limit {
        wallets.truncate(limit);
    }

    Ok(Json(ApiResponse {
        success: true,
        data: Some(WalletList {
            mode,
            rank_by,
            generated_at: snapshot.meta.generated_at,
            wallets,
        }),
        error: None,
    }))
}

/// GET /api/wallets/{address}
pub async fn detail(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<ApiResponse<WalletDetail>>, AppError> {
    let store = state.store.read().await;
    let snapshot = store.as_ref().ok_or_else(not_ready)?;

    let wanted = address.trim();
    let (mode, wallet) = ActivityMode::ALL
        .into_iter()
        .find_map(|mode| {
            snapshot
                .wallets(mode)
                .iter()
                .find(|w| w.address.eq_ignore_ascii_case(wanted))
                .map(|w| (mode, w.clone()))
        })
        .ok_or_else(|| AppError::NotFound(format!("wallet {wanted} not in current scan")))?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(WalletDetail { mode, wallet }),
        error: None,
    }))
}

/// GET /api/meta
pub async fn meta(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<MetaSummary>>, AppError> {
    let watched = state.watchlist.read().await.len();
    let store = state.store.read().await;
    let snapshot = store.as_ref().ok_or_else(not_ready)?;

    Ok(Json(ApiResponse {
        success: true,
        data: Some(MetaSummary {
            meta: snapshot.meta.clone(),
            default_rank_by: state.config.default_rank_by,
            active: snapshot.active.len(),
            inactive: snapshot.inactive.len(),
            watched,
        }),
        error: None,
    }))
}
