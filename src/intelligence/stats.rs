/// Bessel-corrected sample standard deviation.
/// Returns `None` for fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;

    let variance = values
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / (n - 1.0);

    Some(variance.sqrt())
}

/// Largest peak-to-trough decline of `series` as a non-negative fraction of
/// the running peak. The peak starts at `series[0]`; points where the peak is
/// zero contribute no drawdown. Returns `None` for fewer than two values.
pub fn max_drawdown_fraction(series: &[f64]) -> Option<f64> {
    let first = *series.first()?;
    if series.len() < 2 {
        return None;
    }

    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &v in series {
        if v > peak {
            peak = v;
        }
        let dd = if peak != 0.0 { (peak - v) / peak } else { 0.0 };
        max_dd = max_dd.max(dd);
    }

    Some(max_dd)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
