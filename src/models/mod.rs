pub mod fill;
pub mod position;
pub mod snapshot;
pub mod wallet;
pub mod window;

pub use fill::Fill;
pub use position::{PositionSide, PositionView, RawPosition};
pub use snapshot::{ActivityMode, ScanMeta, ScanSnapshot};
pub use wallet::{AccountSnapshot, LiveOverlay, WalletInputs, WalletView};
pub use window::{PortfolioMetrics, PortfolioWindows, SeriesPoint, WindowMetrics, WindowSeries};

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// FillSide
// ---------------------------------------------------------------------------

/// Direction of an executed trade. Hyperliquid encodes buys as `"B"` (bid)
/// and sells as `"A"` (ask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FillSide {
    Buy,
    Sell,
}

impl FillSide {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "B" | "BUY" | "BID" => Some(FillSide::Buy),
            "A" | "S" | "SELL" | "ASK" => Some(FillSide::Sell),
            _ => None,
        }
    }

    /// Signed position change produced by a trade of `size` on this side.
    pub fn signed(&self, size: f64) -> f64 {
        match self {
            FillSide::Buy => size,
            FillSide::Sell => -size,
        }
    }
}

impl fmt::Display for FillSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillSide::Buy => write!(f, "BUY"),
            FillSide::Sell => write!(f, "SELL"),
        }
    }
}
