use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures_util::stream::{self, StreamExt};
use metrics::{counter, gauge, histogram};
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use crate::config::AppConfig;
use crate::hyperliquid::InfoClient;
use crate::intelligence::{build_wallet_view, is_active, normalize_positions, rank_wallets, RankBy};
use crate::models::{AccountSnapshot, ScanMeta, ScanSnapshot, WalletInputs, WalletView};

use super::export;

/// Latest completed scan, shared with the API and the live-refresh loop.
/// `None` until the first cycle succeeds.
pub type ScanStore = Arc<RwLock<Option<ScanSnapshot>>>;

pub fn new_store() -> ScanStore {
    Arc::new(RwLock::new(None))
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub addresses: Vec<String>,
    pub min_account_value: f64,
    pub active_days: i64,
    /// 0 = no limit.
    pub candidate_limit: usize,
    pub batch_size: usize,
    pub fetch_concurrency: usize,
    pub include_portfolio: bool,
    pub rank_by: RankBy,
}

impl From<&AppConfig> for ScanConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            addresses: config.addresses.clone(),
            min_account_value: config.min_account_value,
            active_days: config.active_days,
            candidate_limit: config.candidate_limit,
            batch_size: config.batch_size,
            fetch_concurrency: config.fetch_concurrency,
            include_portfolio: config.include_portfolio,
            rank_by: config.default_rank_by,
        }
    }
}

/// Fully materialized inputs for one candidate wallet.
#[derive(Debug, Clone)]
pub struct FetchedWallet {
    pub address: String,
    pub inputs: WalletInputs,
}

/// Run the scan loop: one cycle immediately, then every `interval_secs`.
/// A failed cycle leaves the previous snapshot in the store.
pub async fn run_scanner(
    client: InfoClient,
    config: ScanConfig,
    store: ScanStore,
    out_dir: Option<PathBuf>,
    interval_secs: u64,
) {
    tracing::info!(
        addresses = config.addresses.len(),
        interval_secs = interval_secs,
        "Scanner started"
    );

    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;
        let started = Instant::now();

        match run_scan(&client, &config).await {
            Ok(snapshot) => {
                counter!("scan_cycles_total").increment(1);
                gauge!("active_wallets").set(snapshot.active.len() as f64);
                gauge!("inactive_wallets").set(snapshot.inactive.len() as f64);

                if let Some(dir) = &out_dir {
                    match export::write_snapshot(dir, &snapshot).await {
                        Ok(files) => tracing::info!(
                            dir = %dir.display(),
                            files = files.len(),
                            "Snapshot exported"
                        ),
                        Err(e) => tracing::warn!(error = %e, "Snapshot export failed"),
                    }
                }

                tracing::info!(
                    active = snapshot.active.len(),
                    inactive = snapshot.inactive.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Scan cycle complete"
                );
                *store.write().await = Some(snapshot);
            }
            Err(e) => {
                counter!("scan_failures_total").increment(1);
                tracing::error!(error = %e, "Scan cycle failed, keeping previous snapshot");
            }
        }

        histogram!("scan_duration_seconds").record(started.elapsed().as_secs_f64());
    }
}

/// One complete scan: mids, account states, candidate filter,
/// fills and portfolio, engine, ranked snapshot.
pub async fn run_scan(client: &InfoClient, config: &ScanConfig) -> anyhow::Result<ScanSnapshot> {
    if config.addresses.is_empty() {
        anyhow::bail!("no addresses configured");
    }

    let mids = client.all_mids().await?;
    if mids.is_empty() {
        anyhow::bail!("allMids returned no prices");
    }

    let (states, failed_states) = fetch_states(client, &config.addresses, config.batch_size).await;
    tracing::info!(
        fetched = states.len(),
        requested = config.addresses.len(),
        failed = failed_states.len(),
        "Account states fetched"
    );

    let candidates = select_candidates(states, &mids, config);
    tracing::info!(count = candidates.len(), "Candidates after value + positions filter");

    let include_portfolio = config.include_portfolio;
    let fetched: Vec<FetchedWallet> = stream::iter(candidates)
        .map(|(address, snapshot)| async move {
            let fills = match client.user_fills(&address).await {
                Ok(f) => Some(f),
                Err(e) => {
                    tracing::warn!(error = %e, wallet = %address, "Failed to fetch fills");
                    None
                }
            };

            let windows = if include_portfolio {
                match client.portfolio(&address).await {
                    Ok(w) => Some(w),
                    Err(e) => {
                        tracing::warn!(error = %e, wallet = %address, "Failed to fetch portfolio");
                        None
                    }
                }
            } else {
                None
            };

            FetchedWallet {
                address,
                inputs: WalletInputs {
                    snapshot,
                    fills,
                    windows,
                },
            }
        })
        .buffered(config.fetch_concurrency.max(1))
        .collect()
        .await;

    let now = Utc::now();
    let meta = ScanMeta {
        generated_at: now,
        source: client.info_url().to_string(),
        min_account_value: config.min_account_value,
        active_days: config.active_days,
        addresses_requested: config.addresses.len(),
        candidates: fetched.len(),
        failed_states,
        failed_fills: fetched
            .iter()
            .filter(|w| w.inputs.fills.is_none())
            .map(|w| w.address.clone())
            .collect(),
        failed_portfolios: if include_portfolio {
            fetched
                .iter()
                .filter(|w| w.inputs.windows.is_none())
                .map(|w| w.address.clone())
                .collect()
        } else {
            Vec::new()
        },
    };

    Ok(assemble_snapshot(meta, &fetched, &mids, now, config))
}

/// Fetch account states in batches; a batch that fails as a whole is retried
/// one address at a time. Returns states in request order plus the
/// addresses that could not be fetched.
async fn fetch_states(
    client: &InfoClient,
    addresses: &[String],
    batch_size: usize,
) -> (Vec<(String, AccountSnapshot)>, Vec<String>) {
    let mut states = Vec::with_capacity(addresses.len());
    let mut failed = Vec::new();

    for batch in addresses.chunks(batch_size.max(1)) {
        match client.batch_clearinghouse_states(batch).await {
            Ok(results) => {
                for (address, state) in batch.iter().zip(results) {
                    match state {
                        Some(s) => states.push((address.clone(), s)),
                        None => failed.push(address.clone()),
                    }
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    size = batch.len(),
                    "Batch state fetch failed, falling back to per-wallet requests"
                );
                for address in batch {
                    match client.clearinghouse_state(address).await {
                        Ok(s) => states.push((address.clone(), s)),
                        Err(e) => {
                            tracing::debug!(error = %e, wallet = %address, "State fetch failed");
                            failed.push(address.clone());
                        }
                    }
                }
            }
        }
    }

    (states, failed)
}

/// Keep wallets at or above the minimum account value that hold at least
/// one non-flat position, honoring the candidate limit.
pub fn select_candidates(
    states: Vec<(String, AccountSnapshot)>,
    mids: &HashMap<String, f64>,
    config: &ScanConfig,
) -> Vec<(String, AccountSnapshot)> {
    let limit = if config.candidate_limit == 0 {
        usize::MAX
    } else {
        config.candidate_limit
    };

    states
        .into_iter()
        .filter(|(_, s)| s.equity >= config.min_account_value)
        .filter(|(_, s)| !normalize_positions(s.equity, &s.raw_positions, mids).is_empty())
        .take(limit)
        .collect()
}

/// Run the engine over fetched wallets, split them by activity and rank each
/// half under the configured criterion.
pub fn assemble_snapshot(
    meta: ScanMeta,
    fetched: &[FetchedWallet],
    mids: &HashMap<String, f64>,
    now: DateTime<Utc>,
    config: &ScanConfig,
) -> ScanSnapshot {
    let (active, inactive): (Vec<WalletView>, Vec<WalletView>) = fetched
        .iter()
        .map(|w| build_wallet_view(&w.address, &w.inputs, mids, now))
        .partition(|w| is_active(w.last_trade_at, now, config.active_days));

    ScanSnapshot {
        meta,
        active: rank_wallets(active, config.rank_by),
        inactive: rank_wallets(inactive, config.rank_by),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
