use crate::models::PositionView;

const MARGIN_WEIGHT: f64 = 0.40;
const LEVERAGE_WEIGHT: f64 = 0.30;
const LIQUIDATION_WEIGHT: f64 = 0.30;

/// Leverage at or above this saturates the leverage component.
const LEVERAGE_CAP: f64 = 50.0;
/// Liquidation distances at or above this many percent score as safe.
const LIQ_DISTANCE_CAP_PCT: f64 = 50.0;
/// Liquidation component used when no position has a known distance.
const NEUTRAL_LIQUIDATION_SCORE: f64 = 0.25;

/// Composite 0 to 100 risk score from margin usage, leverage and liquidation
/// proximity. Zero for a wallet without equity or without positions.
pub fn risk_score(equity: f64, positions: &[PositionView]) -> f64 {
    if equity <= 0.0 || positions.is_empty() {
        return 0.0;
    }

    let score = 100.0
        * (MARGIN_WEIGHT * margin_ratio(equity, positions)
            + LEVERAGE_WEIGHT * leverage_score(positions)
            + LIQUIDATION_WEIGHT * liquidation_score(positions));

    score.clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Share of equity committed as margin, capped at 1.
pub fn margin_ratio(equity: f64, positions: &[PositionView]) -> f64 {
    let total_margin = positions.iter().map(|p| p.margin_used).sum::<f64>();
    (total_margin / equity).min(1.0)
}

/// Highest leverage across positions relative to the cap.
pub fn leverage_score(positions: &[PositionView]) -> f64 {
    let max_lev = positions.iter().map(|p| p.leverage).fold(0.0_f64, f64::max);
    (max_lev / LEVERAGE_CAP).min(1.0)
}

/// Proximity of the closest liquidation: 1 at the mark, 0 at 50% away or more.
pub fn liquidation_score(positions: &[PositionView]) -> f64 {
    let closest = positions
        .iter()
        .filter_map(|p| p.liq_distance_pct)
        .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))));

    match closest {
        Some(d) => 1.0 - (d / LIQ_DISTANCE_CAP_PCT).min(1.0),
        None => NEUTRAL_LIQUIDATION_SCORE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PositionSide;

    fn position(margin_used: f64, leverage: f64, liq_distance_pct: Option<f64>) -> PositionView {
        PositionView {
            coin: "BTC".into(),
            side: PositionSide::Long,
            size: 2.0,
            entry_px: 50_000.0,
            mark_px: Some(50_000.0),
            position_value: 100_000.0,
            unrealized_pnl: 0.0,
            roe_pct: None,
            leverage,
            liquidation_px: None,
            margin_used,
            notional_pct_equity: None,
            liq_distance_pct,
            age_days: None,
        }
    }

    #[test]
    fn test_no_equity_scores_zero() {
        assert_eq!(risk_score(0.0, &[position(1_000.0, 20.0, Some(5.0))]), 0.0);
        assert_eq!(risk_score(-50.0, &[position(1_000.0, 20.0, Some(5.0))]), 0.0);
    }

    #[test]
    fn test_no_positions_scores_zero() {
        assert_eq!(risk_score(1_000.0, &[]), 0.0);
    }

    #[test]
    fn test_reference_wallet() {
        // margin 0.2, leverage 10/50 = 0.2, liquidation 1 - 40/50 = 0.2
        let score = risk_score(100_000.0, &[position(20_000.0, 10.0, Some(40.0))]);
        assert!((score - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_closest_liquidation_dominates() {
        let positions = vec![
            position(0.0, 0.0, Some(45.0)),
            position(0.0, 0.0, Some(5.0)),
        ];
        assert!((liquidation_score(&positions) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_liquidation_is_neutral() {
        let positions = vec![position(0.0, 0.0, None)];
        assert_eq!(liquidation_score(&positions), NEUTRAL_LIQUIDATION_SCORE);
        let score = risk_score(1_000.0, &positions);
        assert!((score - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_saturates_at_100() {
        let score = risk_score(1_000.0, &[position(5_000.0, 100.0, Some(0.0))]);
        assert_eq!(score, 100.0);
    }
}
