use std::time::Duration;

use whalescan::api::router::create_router;
use whalescan::config::AppConfig;
use whalescan::hyperliquid::InfoClient;
use whalescan::services::live_refresh::{self, new_watchlist, RefreshGuard};
use whalescan::services::scanner::{self, new_store, ScanConfig};
use whalescan::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = whalescan::metrics::init_metrics()?;

    let info_client = InfoClient::with_timeout(
        config.info_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let store = new_store();
    let watchlist = new_watchlist(config.watch_addresses.iter().cloned());
    let refresh_guard = RefreshGuard::new();

    // --- Scanner: full universe scan on an interval ---
    if config.addresses.is_empty() {
        tracing::warn!("No addresses configured (WHALE_ADDRESSES / WHALE_ADDRESS_FILE), scanner will not start");
    } else {
        let scan_client = info_client.clone();
        let scan_config = ScanConfig::from(&config);
        let scan_store = store.clone();
        let out_dir = config.out_dir.clone();
        let interval_secs = config.scan_interval_secs;
        tokio::spawn(async move {
            scanner::run_scanner(scan_client, scan_config, scan_store, out_dir, interval_secs).await;
        });
        tracing::info!(
            addresses = config.addresses.len(),
            rank_by = %config.default_rank_by,
            "Scanner spawned"
        );
    }

    // --- Live refresh of the watched subset ---
    if config.refresh_interval_secs > 0 {
        let refresh_client = info_client.clone();
        let refresh_store = store.clone();
        let refresh_watchlist = watchlist.clone();
        let guard = refresh_guard.clone();
        let interval_secs = config.refresh_interval_secs;
        tokio::spawn(async move {
            live_refresh::run_live_refresh(
                refresh_client,
                refresh_store,
                refresh_watchlist,
                guard,
                interval_secs,
            )
            .await;
        });
    } else {
        tracing::info!("Live refresh loop disabled (REFRESH_INTERVAL_SECS=0)");
    }

    let state = AppState {
        config,
        store,
        watchlist,
        refresh_guard,
        info_client,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
