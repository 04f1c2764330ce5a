use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, gauge};
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};

use crate::hyperliquid::InfoClient;
use crate::intelligence::live_overlay;
use crate::models::{LiveOverlay, ScanSnapshot};

use super::scanner::ScanStore;

/// Addresses selected for live refresh.
pub type Watchlist = Arc<RwLock<BTreeSet<String>>>;

pub fn new_watchlist(initial: impl IntoIterator<Item = String>) -> Watchlist {
    Arc::new(RwLock::new(initial.into_iter().collect()))
}

/// Single in-flight guard: at most one refresh cycle runs at a time.
#[derive(Debug, Clone, Default)]
pub struct RefreshGuard {
    in_flight: Arc<AtomicBool>,
}

/// Held for the duration of one refresh. Releases the guard on drop.
#[derive(Debug)]
pub struct RefreshPermit {
    in_flight: Arc<AtomicBool>,
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<RefreshPermit> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshPermit {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for RefreshPermit {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Another refresh was already running.
    Skipped,
    Completed { refreshed: usize, failed: usize },
}

/// Periodically refresh the watched wallets.
pub async fn run_live_refresh(
    client: InfoClient,
    store: ScanStore,
    watchlist: Watchlist,
    guard: RefreshGuard,
    interval_secs: u64,
) {
    tracing::info!(interval_secs = interval_secs, "Live refresh started");
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;

        match refresh_watched(&client, &store, &watchlist, &guard).await {
            Ok(RefreshOutcome::Skipped) => {
                tracing::debug!("Live refresh skipped, previous cycle still running");
            }
            Ok(RefreshOutcome::Completed { refreshed, failed }) => {
                if refreshed > 0 || failed > 0 {
                    tracing::info!(refreshed, failed, "Live refresh cycle complete");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Live refresh failed"),
        }
    }
}

/// Fetch fresh account state for every watched wallet and overlay it onto
/// the current snapshot. All network I/O completes before the store is
/// locked for writing.
pub async fn refresh_watched(
    client: &InfoClient,
    store: &ScanStore,
    watchlist: &Watchlist,
    guard: &RefreshGuard,
) -> anyhow::Result<RefreshOutcome> {
    let Some(_permit) = guard.try_acquire() else {
        counter!("live_refresh_skipped_total").increment(1);
        return Ok(RefreshOutcome::Skipped);
    };

    let watched: Vec<String> = watchlist.read().await.iter().cloned().collect();
    gauge!("watched_wallets").set(watched.len() as f64);
    if watched.is_empty() {
        return Ok(RefreshOutcome::Completed {
            refreshed: 0,
            failed: 0,
        });
    }

    let mids = client.all_mids().await?;
    let now = Utc::now();

    let mut overlays = Vec::with_capacity(watched.len());
    let mut failed = 0;
    for address in &watched {
        match client.clearinghouse_state(address).await {
            Ok(snapshot) => overlays.push((address.clone(), live_overlay(&snapshot, &mids, now))),
            Err(e) => {
                failed += 1;
                tracing::warn!(error = %e, wallet = %address, "Live refresh: state fetch failed");
            }
        }
    }

    let refreshed = {
        let mut current = store.write().await;
        match current.as_mut() {
            Some(snapshot) => apply_overlays(snapshot, overlays),
            None => 0,
        }
    };

    counter!("live_refresh_total").increment(1);
    Ok(RefreshOutcome::Completed { refreshed, failed })
}

/// Attach overlays to matching wallets; returns how many were applied.
/// Overlays for wallets outside the snapshot are dropped.
pub fn apply_overlays(snapshot: &mut ScanSnapshot, overlays: Vec<(String, LiveOverlay)>) -> usize {
    let mut applied = 0;
    for (address, overlay) in overlays {
        if let Some(wallet) = snapshot.find_mut(&address) {
            wallet.live = Some(overlay);
            applied += 1;
        }
    }
    applied
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_allows_single_holder() {
        let guard = RefreshGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.is_in_flight());
        assert!(guard.try_acquire().is_none());

        // clones share the same flag
        assert!(guard.clone().try_acquire().is_none());

        drop(permit);
        assert!(!guard.is_in_flight());
        assert!(guard.try_acquire().is_some());
    }

    #[tokio::test]
    async fn test_refresh_skipped_while_in_flight() {
        let client = InfoClient::new(reqwest::Client::new(), "http://127.0.0.1:9/info");
        let store = crate::services::scanner::new_store();
        let watchlist = new_watchlist(vec!["0x00000000000000000000000000000000000000aa".to_string()]);
        let guard = RefreshGuard::new();

        let _held = guard.try_acquire().unwrap();
        let outcome = refresh_watched(&client, &store, &watchlist, &guard).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_refresh_with_empty_watchlist() {
        let client = InfoClient::new(reqwest::Client::new(), "http://127.0.0.1:9/info");
        let store = crate::services::scanner::new_store();
        let watchlist = new_watchlist(Vec::new());
        let guard = RefreshGuard::new();

        let outcome = refresh_watched(&client, &store, &watchlist, &guard).await.unwrap();
        assert_eq!(outcome, RefreshOutcome::Completed { refreshed: 0, failed: 0 });
        assert!(!guard.is_in_flight());
    }
}
