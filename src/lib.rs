pub mod api;
pub mod config;
pub mod errors;
pub mod hyperliquid;
pub mod intelligence;
pub mod metrics;
pub mod models;
pub mod services;

use crate::config::AppConfig;
use crate::hyperliquid::InfoClient;
use crate::services::live_refresh::{RefreshGuard, Watchlist};
use crate::services::scanner::ScanStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: ScanStore,
    pub watchlist: Watchlist,
    pub refresh_guard: RefreshGuard,
    pub info_client: InfoClient,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}
