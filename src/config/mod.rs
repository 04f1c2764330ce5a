use std::env;
use std::path::PathBuf;

use crate::hyperliquid::{normalize_address, DEFAULT_INFO_URL};
use crate::intelligence::RankBy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Data source
    pub info_url: String,
    pub request_timeout_secs: u64,

    // Universe
    pub addresses: Vec<String>,
    pub min_account_value: f64,
    pub active_days: i64,
    pub candidate_limit: usize,

    // Scan cycle
    pub batch_size: usize,
    pub fetch_concurrency: usize,
    pub include_portfolio: bool,
    pub scan_interval_secs: u64,
    pub default_rank_by: RankBy,
    pub out_dir: Option<PathBuf>,

    // Live refresh
    pub refresh_interval_secs: u64,
    pub watch_addresses: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut addresses = parse_address_list(&env::var("WHALE_ADDRESSES").unwrap_or_default());
        if let Ok(path) = env::var("WHALE_ADDRESS_FILE") {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("failed to read WHALE_ADDRESS_FILE {path}: {e}"))?;
            addresses.extend(parse_address_file(&contents));
        }
        dedupe_keep_order(&mut addresses);

        let default_rank_by = env::var("DEFAULT_RANK_BY")
            .unwrap_or_else(|_| "risk".into())
            .parse::<RankBy>()?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            info_url: env::var("HYPERLIQUID_INFO_URL").unwrap_or_else(|_| DEFAULT_INFO_URL.into()),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 20),

            addresses,
            min_account_value: parse_or("MIN_ACCOUNT_VALUE", 50_000.0),
            active_days: parse_or("ACTIVE_DAYS", 14),
            candidate_limit: parse_or("CANDIDATE_LIMIT", 0),

            batch_size: parse_or("BATCH_SIZE", 25usize).max(1),
            fetch_concurrency: parse_or("FETCH_CONCURRENCY", 4usize).max(1),
            include_portfolio: parse_or("INCLUDE_PORTFOLIO", true),
            scan_interval_secs: parse_or("SCAN_INTERVAL_SECS", 900),
            default_rank_by,
            out_dir: env::var("OUT_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),

            refresh_interval_secs: parse_or("REFRESH_INTERVAL_SECS", 30),
            watch_addresses: parse_address_list(&env::var("WATCH_ADDRESSES").unwrap_or_default()),
        })
    }
}

/// Read `key` and parse it, falling back to `default` when unset or invalid.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated addresses; invalid entries are dropped.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_address).collect()
}

/// One address per line; blank lines and `#` comments are ignored.
pub fn parse_address_file(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter_map(normalize_address)
        .collect()
}

fn dedupe_keep_order(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain(|a| seen.insert(a.clone()));
}
