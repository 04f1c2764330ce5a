use std::collections::HashMap;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use whalescan::config::AppConfig;
use whalescan::hyperliquid::parse::{parse_account_snapshot, parse_fills, parse_portfolio_windows};
use whalescan::hyperliquid::InfoClient;
use whalescan::intelligence::RankBy;
use whalescan::models::{ScanMeta, ScanSnapshot, WalletInputs};
use whalescan::services::live_refresh::{new_watchlist, RefreshGuard};
use whalescan::services::scanner::{assemble_snapshot, new_store, FetchedWallet, ScanConfig};
use whalescan::AppState;

pub const CALM_WHALE: &str = "0x00000000000000000000000000000000000000c1";
pub const HOT_WHALE: &str = "0x00000000000000000000000000000000000000a2";
pub const DORMANT_WHALE: &str = "0x00000000000000000000000000000000000000d3";

/// Nothing listens on the discard port, so any request fails fast.
pub const UNREACHABLE_INFO_URL: &str = "http://127.0.0.1:9/info";

#[allow(dead_code)]
pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        info_url: UNREACHABLE_INFO_URL.into(),
        request_timeout_secs: 2,
        addresses: vec![CALM_WHALE.into(), HOT_WHALE.into(), DORMANT_WHALE.into()],
        min_account_value: 50_000.0,
        active_days: 14,
        candidate_limit: 0,
        batch_size: 25,
        fetch_concurrency: 4,
        include_portfolio: true,
        scan_interval_secs: 900,
        default_rank_by: RankBy::Risk,
        out_dir: None,
        refresh_interval_secs: 30,
        watch_addresses: vec![],
    }
}

#[allow(dead_code)]
pub fn mids() -> HashMap<String, f64> {
    HashMap::from([
        ("BTC".to_string(), 65_000.0),
        ("ETH".to_string(), 3_200.0),
        ("SOL".to_string(), 150.0),
    ])
}

fn ms_ago(now: DateTime<Utc>, days: i64) -> i64 {
    (now - Duration::days(days)).timestamp_millis()
}

/// Three wallets as the info endpoint would report them:
/// - a large, lightly levered BTC long with a month of steady gains
/// - a heavily margined ETH short near liquidation, portfolio unavailable
/// - a SOL holder that has not traded in over a month
#[allow(dead_code)]
pub fn fixture_wallets(now: DateTime<Utc>) -> Vec<FetchedWallet> {
    let calm_state = json!({
        "marginSummary": { "accountValue": "200000.0", "totalMarginUsed": "6500.0" },
        "assetPositions": [{
            "type": "oneWay",
            "position": {
                "coin": "BTC", "szi": "1.0", "entryPx": "60000.0",
                "positionValue": "65000.0", "unrealizedPnl": "5000.0",
                "returnOnEquity": "0.83", "leverage": { "type": "cross", "value": 10 },
                "liquidationPx": "40000.0", "marginUsed": "6500.0"
            }
        }]
    });
    let calm_fills = json!([
        { "coin": "BTC", "side": "B", "sz": "1.0", "startPosition": "0.0", "time": ms_ago(now, 10) }
    ]);
    let calm_portfolio = json!([
        ["month", {
            "accountValueHistory": [
                [ms_ago(now, 30), "180000.0"],
                [ms_ago(now, 20), "185000.0"],
                [ms_ago(now, 10), "192000.0"],
                [ms_ago(now, 0), "200000.0"]
            ],
            "pnlHistory": [
                [ms_ago(now, 30), "0.0"],
                [ms_ago(now, 0), "18000.0"]
            ],
            "vlm": "2500000.0"
        }]
    ]);

    let hot_state = json!({
        "marginSummary": { "accountValue": "100000.0", "totalMarginUsed": "60000.0" },
        "assetPositions": [{
            "type": "oneWay",
            "position": {
                "coin": "ETH", "szi": "-20.0", "entryPx": "3150.0",
                "positionValue": "64000.0", "unrealizedPnl": "-1000.0",
                "leverage": { "type": "isolated", "value": 25 },
                "liquidationPx": "3300.0", "marginUsed": "60000.0"
            }
        }]
    });
    let hot_fills = json!([
        { "coin": "ETH", "side": "A", "sz": "20.0", "startPosition": "0.0", "time": ms_ago(now, 1) }
    ]);

    let dormant_state = json!({
        "marginSummary": { "accountValue": "80000.0" },
        "assetPositions": [{
            "position": {
                "coin": "SOL", "szi": "100.0", "entryPx": "120.0",
                "positionValue": "15000.0", "unrealizedPnl": "3000.0",
                "leverage": { "value": 2 }, "marginUsed": "7500.0"
            }
        }]
    });
    let dormant_fills = json!([
        { "coin": "SOL", "side": "B", "sz": "100.0", "startPosition": "0.0", "time": ms_ago(now, 40) }
    ]);

    vec![
        FetchedWallet {
            address: CALM_WHALE.into(),
            inputs: WalletInputs {
                snapshot: parse_account_snapshot(&calm_state),
                fills: Some(parse_fills(&calm_fills)),
                windows: Some(parse_portfolio_windows(&calm_portfolio)),
            },
        },
        FetchedWallet {
            address: HOT_WHALE.into(),
            inputs: WalletInputs {
                snapshot: parse_account_snapshot(&hot_state),
                fills: Some(parse_fills(&hot_fills)),
                windows: None,
            },
        },
        FetchedWallet {
            address: DORMANT_WHALE.into(),
            inputs: WalletInputs {
                snapshot: parse_account_snapshot(&dormant_state),
                fills: Some(parse_fills(&dormant_fills)),
                windows: Some(parse_portfolio_windows(&json!({}))),
            },
        },
    ]
}

#[allow(dead_code)]
pub fn fixture_snapshot() -> ScanSnapshot {
    let now = Utc::now();
    let config = test_config();
    let fetched = fixture_wallets(now);
    let meta = ScanMeta {
        generated_at: now,
        source: UNREACHABLE_INFO_URL.into(),
        min_account_value: config.min_account_value,
        active_days: config.active_days,
        addresses_requested: config.addresses.len(),
        candidates: fetched.len(),
        failed_states: vec![],
        failed_fills: vec![],
        failed_portfolios: vec![HOT_WHALE.into()],
    };
    assemble_snapshot(meta, &fetched, &mids(), now, &ScanConfig::from(&config))
}

/// App state with an optional pre-loaded snapshot and an info client that
/// cannot reach any upstream.
#[allow(dead_code)]
pub async fn build_state(snapshot: Option<ScanSnapshot>) -> AppState {
    let store = new_store();
    *store.write().await = snapshot;

    AppState {
        config: test_config(),
        store,
        watchlist: new_watchlist(Vec::new()),
        refresh_guard: RefreshGuard::new(),
        info_client: InfoClient::new(reqwest::Client::new(), UNREACHABLE_INFO_URL),
        metrics_handle: whalescan::metrics::detached_handle(),
    }
}

/// Send one request through the router and decode the JSON body.
#[allow(dead_code)]
pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
