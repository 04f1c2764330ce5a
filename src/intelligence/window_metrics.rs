use crate::models::{SeriesPoint, WindowMetrics, WindowSeries};

use super::stats::{max_drawdown_fraction, sample_std_dev};

/// Compute growth, PnL, volatility and drawdown for one lookback window.
///
/// Start and end values are the first and last account-value samples after
/// ordering by timestamp. PnL change is expressed against the starting
/// account value so wallets of different sizes compare on the same footing.
pub fn window_return_metrics(series: &WindowSeries) -> WindowMetrics {
    if series.account_values.len() < 2 {
        return WindowMetrics::default();
    }

    let av = chronological_values(&series.account_values);
    let start_av = av[0];
    let end_av = av[av.len() - 1];

    let growth_pct = if start_av > 0.0 {
        Some((end_av - start_av) / start_av * 100.0)
    } else {
        None
    };

    let pnl_pct = if series.pnls.len() >= 2 && start_av > 0.0 {
        let pnls = chronological_values(&series.pnls);
        Some((pnls[pnls.len() - 1] - pnls[0]) / start_av * 100.0)
    } else {
        None
    };

    let returns = point_returns(&av);
    let vol_pct_daily = sample_std_dev(&returns).map(|sd| sd * 100.0);

    let max_drawdown_pct = max_drawdown_fraction(&av).map(|dd| dd * 100.0);

    WindowMetrics {
        growth_pct,
        pnl_pct,
        vol_pct_daily,
        max_drawdown_pct,
    }
}

/// Simple returns between consecutive samples, skipping pairs whose earlier
/// value is not positive.
pub fn point_returns(values: &[f64]) -> Vec<f64> {
    values
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

fn chronological_values(points: &[SeriesPoint]) -> Vec<f64> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.time);
    sorted.into_iter().map(|p| p.value).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(i64, f64)]) -> Vec<SeriesPoint> {
        values.iter().map(|&(t, v)| SeriesPoint::new(t, v)).collect()
    }

    fn series(av: &[(i64, f64)], pnl: &[(i64, f64)]) -> WindowSeries {
        WindowSeries {
            account_values: points(av),
            pnls: points(pnl),
            volume: 0.0,
        }
    }

    #[test]
    fn test_steady_compounding() {
        let m = window_return_metrics(&series(&[(0, 1000.0), (1, 1100.0), (2, 1210.0)], &[]));
        assert!((m.growth_pct.unwrap() - 21.0).abs() < 1e-9);
        assert!(m.vol_pct_daily.unwrap().abs() < 1e-9);
        assert_eq!(m.max_drawdown_pct, Some(0.0));
        assert_eq!(m.pnl_pct, None);
    }

    #[test]
    fn test_point_returns() {
        let r = point_returns(&[1000.0, 1100.0, 1210.0]);
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_point_returns_skip_non_positive_base() {
        let r = point_returns(&[0.0, 100.0, 110.0]);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn test_short_series_is_all_none() {
        let m = window_return_metrics(&series(&[(0, 1000.0)], &[(0, 0.0), (1, 5.0)]));
        assert_eq!(m, WindowMetrics::default());
    }

    #[test]
    fn test_pnl_uses_starting_account_value() {
        let m = window_return_metrics(&series(
            &[(0, 2000.0), (1, 2500.0)],
            &[(0, 100.0), (1, 600.0)],
        ));
        assert!((m.pnl_pct.unwrap() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_start_has_no_ratios() {
        let m = window_return_metrics(&series(
            &[(0, 0.0), (1, 1000.0), (2, 900.0)],
            &[(0, 0.0), (1, 50.0)],
        ));
        assert_eq!(m.growth_pct, None);
        assert_eq!(m.pnl_pct, None);
        // only one valid consecutive pair
        assert_eq!(m.vol_pct_daily, None);
        assert!(m.max_drawdown_pct.is_some());
    }

    #[test]
    fn test_series_ordered_by_time() {
        let m = window_return_metrics(&series(&[(2, 1210.0), (0, 1000.0), (1, 1100.0)], &[]));
        assert!((m.growth_pct.unwrap() - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_drawdown_reported_as_percent() {
        let m = window_return_metrics(&series(&[(0, 100.0), (1, 150.0), (2, 90.0)], &[]));
        assert!((m.max_drawdown_pct.unwrap() - 40.0).abs() < 1e-9);
        assert!(m.vol_pct_daily.unwrap() > 0.0);
    }
}
