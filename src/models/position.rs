use serde::{Deserialize, Serialize};
use std::fmt;

/// One open exposure as reported by the account-state endpoint, after
/// field lookup but before any derived values are computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    pub coin: String,
    /// Signed size; the sign encodes the side.
    pub size: f64,
    pub entry_px: f64,
    pub position_value: f64,
    pub unrealized_pnl: f64,
    /// Return on equity as a decimal fraction (0.12 = 12%).
    pub return_on_equity: Option<f64>,
    pub leverage: Option<f64>,
    pub liquidation_px: Option<f64>,
    pub margin_used: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn from_size(size: f64) -> Self {
        if size > 0.0 {
            PositionSide::Long
        } else {
            PositionSide::Short
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized position with derived risk fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionView {
    pub coin: String,
    pub side: PositionSide,
    pub size: f64,
    pub entry_px: f64,
    /// Current mark (mid) price; `None` when unavailable.
    pub mark_px: Option<f64>,
    pub position_value: f64,
    pub unrealized_pnl: f64,
    pub roe_pct: Option<f64>,
    pub leverage: f64,
    pub liquidation_px: Option<f64>,
    pub margin_used: f64,
    pub notional_pct_equity: Option<f64>,
    pub liq_distance_pct: Option<f64>,
    pub age_days: Option<f64>,
}
