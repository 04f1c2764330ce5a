use std::fmt;

use serde::{Deserialize, Serialize};

/// Stability tier of a wallet's trading style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleTag {
    /// Low risk, low volatility, shallow drawdowns.
    Stable,
    Balanced,
    /// Any single severe signal: high risk, volatility or drawdown.
    Aggressive,
}

impl StyleTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleTag::Stable => "stable",
            StyleTag::Balanced => "balanced",
            StyleTag::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for StyleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a wallet from its risk score and month-window volatility and
/// drawdown (both in percent; missing values count as 0).
///
/// Rules (any one signal is enough):
/// - **Aggressive**: risk ≥ 70, daily vol ≥ 5%, or drawdown ≥ 25%.
/// - **Balanced**: risk ≥ 40, daily vol ≥ 2%, or drawdown ≥ 12%.
/// - **Stable**: everything else.
pub fn style_label(risk: f64, vol_pct_daily: Option<f64>, max_drawdown_pct: Option<f64>) -> StyleTag {
    let vol = vol_pct_daily.unwrap_or(0.0);
    let dd = max_drawdown_pct.unwrap_or(0.0);

    if risk >= 70.0 || vol >= 5.0 || dd >= 25.0 {
        return StyleTag::Aggressive;
    }

    if risk >= 40.0 || vol >= 2.0 || dd >= 12.0 {
        return StyleTag::Balanced;
    }

    StyleTag::Stable
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
