use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Fill, PortfolioMetrics, PortfolioWindows, PositionView, RawPosition};
use crate::intelligence::StyleTag;

/// Account state for one wallet: collateral value plus raw positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub equity: f64,
    pub raw_positions: Vec<RawPosition>,
}

/// Everything the engine needs to build one `WalletView`.
///
/// `fills` and `windows` are `None` when the corresponding fetch failed or
/// was skipped, which is distinct from an empty history.
#[derive(Debug, Clone, Default)]
pub struct WalletInputs {
    pub snapshot: AccountSnapshot,
    pub fills: Option<Vec<Fill>>,
    pub windows: Option<PortfolioWindows>,
}

/// Fields written by the live-refresh service on top of a scanned wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveOverlay {
    pub refreshed_at: DateTime<Utc>,
    pub account_value: f64,
    pub num_positions: usize,
    pub total_unrealized_pnl: f64,
    pub exposure_pct: Option<f64>,
    pub risk_score: f64,
}

/// Per-wallet output of the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletView {
    pub address: String,
    pub account_value: f64,
    pub last_trade_at: Option<DateTime<Utc>>,
    pub positions: Vec<PositionView>,
    pub num_positions: usize,
    pub total_position_value: f64,
    pub total_unrealized_pnl: f64,
    pub total_margin_used: f64,
    pub exposure_pct: Option<f64>,
    pub margin_pct: Option<f64>,
    pub max_leverage: f64,
    pub min_liq_distance_pct: Option<f64>,
    pub risk_score: f64,
    pub style: StyleTag,
    pub portfolio: PortfolioMetrics,
    pub rank_score: Option<f64>,
    pub rank: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveOverlay>,
}
