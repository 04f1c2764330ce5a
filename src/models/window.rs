use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const WINDOW_WEEK: &str = "week";
pub const WINDOW_MONTH: &str = "month";
pub const WINDOW_ALL_TIME: &str = "allTime";
pub const WINDOW_PERP_ALL_TIME: &str = "perpAllTime";

/// Named lookback windows as delivered by the portfolio endpoint.
pub type PortfolioWindows = HashMap<String, WindowSeries>;

/// A single `(timestamp, value)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Epoch milliseconds.
    pub time: i64,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Account-value and cumulative-PnL history for one lookback window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSeries {
    pub account_values: Vec<SeriesPoint>,
    pub pnls: Vec<SeriesPoint>,
    pub volume: f64,
}

/// Return metrics for one window. Every field is `None` when the series is
/// too short for it to be defined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub growth_pct: Option<f64>,
    pub pnl_pct: Option<f64>,
    pub vol_pct_daily: Option<f64>,
    pub max_drawdown_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    pub month: Option<WindowMetrics>,
    pub week: Option<WindowMetrics>,
    pub all_time: Option<WindowMetrics>,
}
