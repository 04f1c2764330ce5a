use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Fill, PositionView};

/// Tolerance used when deciding whether a replayed position is flat.
const FLAT_EPSILON: f64 = 1e-10;

const MS_PER_DAY: f64 = 86_400_000.0;

/// Infer how many days each open position has been held by replaying the
/// wallet's fill history.
///
/// Fills are grouped by coin and replayed in timestamp order. Each fill's own
/// `start_position` is trusted over any locally accumulated position, since
/// the fetched history may be truncated. For every fill, in order:
///
/// 1. opened from flat → the open time becomes this fill's time
/// 2. closed to flat → the open time is cleared
/// 3. flipped sign → the open time becomes this fill's time
///
/// When nothing survives the replay but fills exist, the earliest fill time is
/// used: the opening trade predates the fetched window.
///
/// Coins without a non-flat current position get no entry.
pub fn infer_position_ages(
    fills: &[Fill],
    positions: &[PositionView],
    now: DateTime<Utc>,
) -> HashMap<String, f64> {
    let current: HashMap<&str, f64> = positions
        .iter()
        .map(|p| (p.coin.as_str(), p.size))
        .collect();

    let mut by_coin: HashMap<&str, Vec<&Fill>> = HashMap::new();
    for fill in fills {
        if current.contains_key(fill.coin.as_str()) {
            by_coin.entry(fill.coin.as_str()).or_default().push(fill);
        }
    }

    let now_ms = now.timestamp_millis();
    let mut ages = HashMap::new();

    for (coin, mut coin_fills) in by_coin {
        let current_size = current.get(coin).copied().unwrap_or(0.0);
        if current_size.abs() < FLAT_EPSILON {
            continue;
        }

        // stable: fills sharing a timestamp keep their delivered order
        coin_fills.sort_by_key(|f| f.time);

        let open_time = replay_open_time(&coin_fills)
            .or_else(|| coin_fills.first().map(|f| f.time));

        if let Some(opened_ms) = open_time {
            let held_ms = now_ms.saturating_sub(opened_ms);
            ages.insert(coin.to_string(), held_ms as f64 / MS_PER_DAY);
        }
    }

    ages
}

/// Walk time-ordered fills for one coin and return the time the current
/// directional position was last opened, if the history shows it.
fn replay_open_time(fills: &[&Fill]) -> Option<i64> {
    let mut open_time = None;

    for fill in fills {
        let start = fill.start_position;
        let end = fill.end_position();

        if start.abs() < FLAT_EPSILON && end.abs() > FLAT_EPSILON {
            open_time = Some(fill.time);
        }
        if end.abs() < FLAT_EPSILON {
            open_time = None;
        }
        if start * end < 0.0 {
            open_time = Some(fill.time);
        }
    }

    open_time
}

/// Copy inferred ages onto the matching positions.
pub fn apply_position_ages(positions: &mut [PositionView], ages: &HashMap<String, f64>) {
    for p in positions.iter_mut() {
        if let Some(age) = ages.get(&p.coin) {
            p.age_days = Some(*age);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FillSide, PositionSide};

    fn fill(coin: &str, start: f64, side: FillSide, size: f64, time: i64) -> Fill {
        Fill {
            coin: coin.into(),
            side,
            size,
            start_position: start,
            time,
        }
    }

    fn position(coin: &str, size: f64) -> PositionView {
        PositionView {
            coin: coin.into(),
            side: PositionSide::from_size(size),
            size,
            entry_px: 1.0,
            mark_px: None,
            position_value: size.abs(),
            unrealized_pnl: 0.0,
            roe_pct: None,
            leverage: 1.0,
            liquidation_px: None,
            margin_used: 0.0,
            notional_pct_equity: None,
            liq_distance_pct: None,
            age_days: None,
        }
    }

    fn at_ms(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn test_closed_to_flat_has_no_age() {
        let fills = vec![
            fill("BTC", 0.0, FillSide::Buy, 5.0, 100),
            fill("BTC", 5.0, FillSide::Sell, 5.0, 200),
        ];
        // flat current position never makes it into the normalized list
        let ages = infer_position_ages(&fills, &[], at_ms(MS_PER_DAY as i64));
        assert!(ages.is_empty());

        let ages = infer_position_ages(&fills, &[position("BTC", 0.0)], at_ms(1_000));
        assert!(ages.is_empty());
    }

    #[test]
    fn test_single_open() {
        let now = 100 + 2 * MS_PER_DAY as i64;
        let fills = vec![fill("BTC", 0.0, FillSide::Buy, 5.0, 100)];
        let ages = infer_position_ages(&fills, &[position("BTC", 5.0)], at_ms(now));
        assert!((ages["BTC"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_time() {
        let now = 10 * MS_PER_DAY as i64;
        // delivered newest first: close at 2d, reopen at 4d, add at 6d
        let fills = vec![
            fill("ETH", 3.0, FillSide::Buy, 1.0, 6 * MS_PER_DAY as i64),
            fill("ETH", 0.0, FillSide::Buy, 3.0, 4 * MS_PER_DAY as i64),
            fill("ETH", 2.0, FillSide::Sell, 2.0, 2 * MS_PER_DAY as i64),
            fill("ETH", 0.0, FillSide::Buy, 2.0, MS_PER_DAY as i64),
        ];
        let ages = infer_position_ages(&fills, &[position("ETH", 4.0)], at_ms(now));
        assert!((ages["ETH"] - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_sign_flip_counts_as_open() {
        let day = MS_PER_DAY as i64;
        let fills = vec![
            fill("SOL", 0.0, FillSide::Buy, 10.0, day),
            fill("SOL", 10.0, FillSide::Sell, 15.0, 3 * day),
        ];
        let ages = infer_position_ages(&fills, &[position("SOL", -5.0)], at_ms(5 * day));
        assert!((ages["SOL"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_close_keeps_open_time() {
        let day = MS_PER_DAY as i64;
        let fills = vec![
            fill("BTC", 0.0, FillSide::Sell, 4.0, day),
            fill("BTC", -4.0, FillSide::Buy, 1.0, 2 * day),
        ];
        let ages = infer_position_ages(&fills, &[position("BTC", -3.0)], at_ms(4 * day));
        assert!((ages["BTC"] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_truncated_history_falls_back_to_earliest_fill() {
        let day = MS_PER_DAY as i64;
        // position opened before the fetched window: only adds are visible
        let fills = vec![
            fill("BTC", 3.0, FillSide::Buy, 1.0, 5 * day),
            fill("BTC", 2.0, FillSide::Buy, 1.0, 3 * day),
        ];
        let ages = infer_position_ages(&fills, &[position("BTC", 4.0)], at_ms(10 * day));
        assert!((ages["BTC"] - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_reopened_after_close_in_window_uses_fallback_when_last_fill_closes() {
        let day = MS_PER_DAY as i64;
        // history ends flat but the live position is open: trust the fallback
        let fills = vec![
            fill("BTC", 0.0, FillSide::Buy, 1.0, 2 * day),
            fill("BTC", 1.0, FillSide::Sell, 1.0, 3 * day),
        ];
        let ages = infer_position_ages(&fills, &[position("BTC", 1.0)], at_ms(4 * day));
        assert!((ages["BTC"] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_fill_time_does_not_overflow() {
        let fills = vec![fill("BTC", 2.0, FillSide::Buy, 1.0, i64::MIN)];
        let ages = infer_position_ages(&fills, &[position("BTC", 3.0)], at_ms(1_000));
        assert!(ages["BTC"].is_finite());
        assert!(ages["BTC"] > 0.0);
    }

    #[test]
    fn test_coins_without_positions_ignored() {
        let fills = vec![fill("DOGE", 0.0, FillSide::Buy, 100.0, 100)];
        let ages = infer_position_ages(&fills, &[position("BTC", 1.0)], at_ms(1_000));
        assert!(ages.is_empty());
    }

    #[test]
    fn test_apply_ages() {
        let mut positions = vec![position("BTC", 1.0), position("ETH", 1.0)];
        let ages: HashMap<String, f64> = [("BTC".to_string(), 3.5)].into_iter().collect();
        apply_position_ages(&mut positions, &ages);
        assert_eq!(positions[0].age_days, Some(3.5));
        assert_eq!(positions[1].age_days, None);
    }
}
