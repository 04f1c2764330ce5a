use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::window::{WINDOW_ALL_TIME, WINDOW_MONTH, WINDOW_WEEK};
use crate::models::{
    AccountSnapshot, LiveOverlay, PortfolioMetrics, PortfolioWindows, PositionView, WalletInputs,
    WalletView,
};

use super::activity::last_trade_at;
use super::classifier::style_label;
use super::normalizer::normalize_positions;
use super::position_age::{apply_position_ages, infer_position_ages};
use super::scorer::risk_score;
use super::window_metrics::window_return_metrics;

/// Build the engine output for one wallet from a fully materialized input
/// set. The result is unranked (`rank_score` and `rank` are `None`).
pub fn build_wallet_view(
    address: &str,
    inputs: &WalletInputs,
    mids: &HashMap<String, f64>,
    now: DateTime<Utc>,
) -> WalletView {
    let equity = inputs.snapshot.equity;
    let mut positions = normalize_positions(equity, &inputs.snapshot.raw_positions, mids);

    let last_trade = match &inputs.fills {
        Some(fills) => {
            let ages = infer_position_ages(fills, &positions, now);
            apply_position_ages(&mut positions, &ages);
            last_trade_at(fills)
        }
        None => None,
    };

    let portfolio = inputs
        .windows
        .as_ref()
        .map(portfolio_metrics)
        .unwrap_or_default();

    let totals = PositionTotals::of(equity, &positions);
    let risk = risk_score(equity, &positions);
    let month = portfolio.month.unwrap_or_default();
    let style = style_label(risk, month.vol_pct_daily, month.max_drawdown_pct);

    WalletView {
        address: address.to_string(),
        account_value: equity,
        last_trade_at: last_trade,
        num_positions: positions.len(),
        total_position_value: totals.position_value,
        total_unrealized_pnl: totals.unrealized_pnl,
        total_margin_used: totals.margin_used,
        exposure_pct: totals.exposure_pct,
        margin_pct: totals.margin_pct,
        max_leverage: totals.max_leverage,
        min_liq_distance_pct: totals.min_liq_distance_pct,
        positions,
        risk_score: risk,
        style,
        portfolio,
        rank_score: None,
        rank: None,
        live: None,
    }
}

/// Metrics for the month, week and all-time windows that were delivered.
pub fn portfolio_metrics(windows: &PortfolioWindows) -> PortfolioMetrics {
    PortfolioMetrics {
        month: windows.get(WINDOW_MONTH).map(window_return_metrics),
        week: windows.get(WINDOW_WEEK).map(window_return_metrics),
        all_time: windows.get(WINDOW_ALL_TIME).map(window_return_metrics),
    }
}

/// Overlay for a watched wallet computed from a freshly fetched snapshot.
pub fn live_overlay(
    snapshot: &AccountSnapshot,
    mids: &HashMap<String, f64>,
    now: DateTime<Utc>,
) -> LiveOverlay {
    let positions = normalize_positions(snapshot.equity, &snapshot.raw_positions, mids);
    let totals = PositionTotals::of(snapshot.equity, &positions);

    LiveOverlay {
        refreshed_at: now,
        account_value: snapshot.equity,
        num_positions: positions.len(),
        total_unrealized_pnl: totals.unrealized_pnl,
        exposure_pct: totals.exposure_pct,
        risk_score: risk_score(snapshot.equity, &positions),
    }
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

struct PositionTotals {
    position_value: f64,
    unrealized_pnl: f64,
    margin_used: f64,
    exposure_pct: Option<f64>,
    margin_pct: Option<f64>,
    max_leverage: f64,
    min_liq_distance_pct: Option<f64>,
}

impl PositionTotals {
    fn of(equity: f64, positions: &[PositionView]) -> Self {
        let position_value = positions.iter().map(|p| p.position_value.abs()).sum::<f64>();
        let margin_used = positions.iter().map(|p| p.margin_used).sum::<f64>();
        let pct_of_equity = |v: f64| if equity > 0.0 { Some(v / equity * 100.0) } else { None };

        Self {
            position_value,
            unrealized_pnl: positions.iter().map(|p| p.unrealized_pnl).sum(),
            margin_used,
            exposure_pct: pct_of_equity(position_value),
            margin_pct: pct_of_equity(margin_used),
            max_leverage: positions.iter().map(|p| p.leverage).fold(0.0, f64::max),
            min_liq_distance_pct: positions
                .iter()
                .filter_map(|p| p.liq_distance_pct)
                .reduce(f64::min),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
