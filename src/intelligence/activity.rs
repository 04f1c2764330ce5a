use chrono::{DateTime, Duration, Utc};

use crate::models::Fill;

/// Timestamp of the most recent fill. Fill order is not assumed.
pub fn last_trade_at(fills: &[Fill]) -> Option<DateTime<Utc>> {
    fills
        .iter()
        .map(|f| f.time)
        .max()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

/// A wallet is active when it traded within the last `active_days` days.
/// Wallets with no known last trade are inactive. A window reaching past the
/// representable time range covers every trade.
pub fn is_active(last_trade: Option<DateTime<Utc>>, now: DateTime<Utc>, active_days: i64) -> bool {
    let Some(t) = last_trade else {
        return false;
    };

    match Duration::try_days(active_days).and_then(|d| now.checked_sub_signed(d)) {
        Some(cutoff) => t >= cutoff,
        None => true,
    }
}
