use serde::{Deserialize, Serialize};

use super::FillSide;

/// One executed trade from a wallet's fill history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub coin: String,
    pub side: FillSide,
    /// Unsigned trade size.
    pub size: f64,
    /// Signed position size immediately before this trade, as recorded by the venue.
    pub start_position: f64,
    /// Execution time in epoch milliseconds.
    pub time: i64,
}

impl Fill {
    /// Signed position size immediately after this trade.
    pub fn end_position(&self) -> f64 {
        self.start_position + self.side.signed(self.size)
    }
}
