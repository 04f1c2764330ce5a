use std::collections::HashMap;

use crate::models::{PositionSide, PositionView, RawPosition};

/// Positions smaller than this are flat and not real exposures.
pub const FLAT_SIZE_EPSILON: f64 = 1e-12;

/// Convert raw account positions into `PositionView`s with derived fields.
///
/// - flat positions (`|size| < 1e-12`) are dropped
/// - `mids` supplies mark prices; missing or non-positive marks stay unknown
/// - ratios against `equity` are `None` when equity is not positive
///
/// Input order is preserved.
pub fn normalize_positions(
    equity: f64,
    raw: &[RawPosition],
    mids: &HashMap<String, f64>,
) -> Vec<PositionView> {
    raw.iter()
        .filter(|p| p.size.is_finite() && p.size.abs() >= FLAT_SIZE_EPSILON)
        .map(|p| normalize_position(equity, p, mids))
        .collect()
}

fn normalize_position(equity: f64, p: &RawPosition, mids: &HashMap<String, f64>) -> PositionView {
    let mark_px = mids
        .get(&p.coin)
        .copied()
        .filter(|m| m.is_finite() && *m > 0.0);

    let leverage = p.leverage.filter(|l| l.is_finite()).unwrap_or(0.0);

    let notional_pct_equity = if equity > 0.0 {
        Some(p.position_value.abs() / equity * 100.0)
    } else {
        None
    };

    PositionView {
        coin: p.coin.clone(),
        side: PositionSide::from_size(p.size),
        size: p.size,
        entry_px: p.entry_px,
        mark_px,
        position_value: p.position_value,
        unrealized_pnl: p.unrealized_pnl,
        roe_pct: p.return_on_equity.map(|roe| roe * 100.0),
        leverage,
        liquidation_px: p.liquidation_px,
        margin_used: p.margin_used,
        notional_pct_equity,
        liq_distance_pct: liq_distance_pct(mark_px, p.liquidation_px),
        age_days: None,
    }
}

/// Percentage gap between mark and liquidation price, relative to mark.
/// A liquidation price of zero means the venue reports none.
pub fn liq_distance_pct(mark_px: Option<f64>, liquidation_px: Option<f64>) -> Option<f64> {
    match (mark_px, liquidation_px) {
        (Some(mark), Some(liq)) if mark > 0.0 && liq > 0.0 => {
            Some((mark - liq).abs() / mark * 100.0)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(coin: &str, size: f64) -> RawPosition {
        RawPosition {
            coin: coin.into(),
            size,
            entry_px: 100.0,
            position_value: 5_000.0,
            unrealized_pnl: 250.0,
            return_on_equity: Some(0.12),
            leverage: Some(5.0),
            liquidation_px: Some(80.0),
            margin_used: 1_000.0,
        }
    }

    fn mids(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_dust_position_excluded() {
        let out = normalize_positions(10_000.0, &[raw("BTC", 0.000_000_000_1)], &HashMap::new());
        assert!(out.is_empty());
    }

    #[test]
    fn test_side_from_sign() {
        let out = normalize_positions(
            10_000.0,
            &[raw("BTC", 2.0), raw("ETH", -3.0)],
            &HashMap::new(),
        );
        assert_eq!(out[0].side, PositionSide::Long);
        assert_eq!(out[1].side, PositionSide::Short);
    }

    #[test]
    fn test_order_preserved() {
        let out = normalize_positions(
            10_000.0,
            &[raw("SOL", 1.0), raw("BTC", 0.0), raw("ETH", 1.0)],
            &HashMap::new(),
        );
        let coins: Vec<&str> = out.iter().map(|p| p.coin.as_str()).collect();
        assert_eq!(coins, vec!["SOL", "ETH"]);
    }

    #[test]
    fn test_derived_fields() {
        let out = normalize_positions(10_000.0, &[raw("BTC", 1.0)], &mids(&[("BTC", 100.0)]));
        let p = &out[0];
        assert_eq!(p.mark_px, Some(100.0));
        assert_eq!(p.notional_pct_equity, Some(50.0));
        assert_eq!(p.liq_distance_pct, Some(20.0));
        assert!((p.roe_pct.unwrap() - 12.0).abs() < 1e-9);
        assert_eq!(p.leverage, 5.0);
        assert_eq!(p.age_days, None);
    }

    #[test]
    fn test_missing_liquidation_price_yields_no_distance() {
        let mut p = raw("BTC", 1.0);
        p.liquidation_px = None;
        let out = normalize_positions(10_000.0, &[p], &mids(&[("BTC", 100.0)]));
        assert_eq!(out[0].liq_distance_pct, None);
    }

    #[test]
    fn test_zero_liquidation_price_yields_no_distance() {
        let mut p = raw("BTC", 1.0);
        p.liquidation_px = Some(0.0);
        let out = normalize_positions(10_000.0, &[p], &mids(&[("BTC", 100.0)]));
        assert_eq!(out[0].liquidation_px, Some(0.0));
        assert_eq!(out[0].liq_distance_pct, None);
        assert_eq!(liq_distance_pct(Some(50_000.0), Some(0.0)), None);
    }

    #[test]
    fn test_non_positive_mark_is_unknown() {
        let out = normalize_positions(10_000.0, &[raw("BTC", 1.0)], &mids(&[("BTC", 0.0)]));
        assert_eq!(out[0].mark_px, None);
        assert_eq!(out[0].liq_distance_pct, None);

        let out = normalize_positions(10_000.0, &[raw("BTC", 1.0)], &HashMap::new());
        assert_eq!(out[0].mark_px, None);
    }

    #[test]
    fn test_non_positive_equity_has_no_share() {
        let out = normalize_positions(0.0, &[raw("BTC", 1.0)], &HashMap::new());
        assert_eq!(out[0].notional_pct_equity, None);
    }

    #[test]
    fn test_missing_leverage_defaults_to_zero() {
        let mut p = raw("BTC", 1.0);
        p.leverage = None;
        let mut q = raw("ETH", 1.0);
        q.leverage = Some(f64::NAN);
        let out = normalize_positions(10_000.0, &[p, q], &HashMap::new());
        assert_eq!(out[0].leverage, 0.0);
        assert_eq!(out[1].leverage, 0.0);
    }
}
