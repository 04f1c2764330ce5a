use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{WalletView, WindowMetrics};

/// Criterion used to order wallets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Highest risk score first.
    Risk,
    /// Best month PnL % (falling back to week, then all-time).
    Pnl,
    /// Lowest month volatility and drawdown first.
    Stability,
    /// Long-held, highly exposed, lower-risk books first.
    Conviction,
    /// Largest account value first.
    AccountValue,
}

impl RankBy {
    /// Criteria exported as individual ranked snapshots.
    pub const SCORED: [RankBy; 4] = [RankBy::Risk, RankBy::Pnl, RankBy::Stability, RankBy::Conviction];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankBy::Risk => "risk",
            RankBy::Pnl => "pnl",
            RankBy::Stability => "stability",
            RankBy::Conviction => "conviction",
            RankBy::AccountValue => "account_value",
        }
    }
}

impl fmt::Display for RankBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rank criterion: {0}")]
pub struct UnknownRankBy(pub String);

impl FromStr for RankBy {
    type Err = UnknownRankBy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "risk" => Ok(RankBy::Risk),
            "pnl" => Ok(RankBy::Pnl),
            "stability" => Ok(RankBy::Stability),
            "conviction" => Ok(RankBy::Conviction),
            "account_value" => Ok(RankBy::AccountValue),
            other => Err(UnknownRankBy(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// Score a wallet under `by`. Non-finite results are reported as `None`.
pub fn rank_score(wallet: &WalletView, by: RankBy) -> Option<f64> {
    let score = match by {
        RankBy::Risk => wallet.risk_score,
        RankBy::Pnl => pnl_score(wallet),
        RankBy::Stability => stability_score(wallet.portfolio.month.as_ref()),
        RankBy::Conviction => conviction_score(wallet),
        RankBy::AccountValue => wallet.account_value,
    };

    Some(score).filter(|s| s.is_finite())
}

/// Month PnL %, else week, else all-time, else 0.
fn pnl_score(wallet: &WalletView) -> f64 {
    let p = &wallet.portfolio;
    [p.month, p.week, p.all_time]
        .iter()
        .flatten()
        .find_map(|w| w.pnl_pct)
        .unwrap_or(0.0)
}

fn stability_score(month: Option<&WindowMetrics>) -> f64 {
    let vol = month.and_then(|m| m.vol_pct_daily).unwrap_or(0.0);
    let dd = month.and_then(|m| m.max_drawdown_pct).unwrap_or(0.0);
    (100.0 - vol * 10.0 - dd * 2.0).max(0.0)
}

fn conviction_score(wallet: &WalletView) -> f64 {
    let ages: Vec<f64> = wallet
        .positions
        .iter()
        .filter_map(|p| p.age_days)
        .filter(|a| a.is_finite())
        .collect();

    let avg_age = if ages.is_empty() {
        0.0
    } else {
        ages.iter().sum::<f64>() / ages.len() as f64
    };
    let exposure = wallet.exposure_pct.unwrap_or(0.0);

    avg_age * 2.0 + exposure * 0.5 - wallet.risk_score * 0.5
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Descending by score, `None` last, equal scores keep input order.
fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable-sort wallets by their existing `rank_score` and number them from 1.
pub fn assign_ranks(mut wallets: Vec<WalletView>) -> Vec<WalletView> {
    wallets.sort_by(|a, b| compare_scores(a.rank_score, b.rank_score));
    for (i, w) in wallets.iter_mut().enumerate() {
        w.rank = Some(i as u32 + 1);
    }
    wallets
}

/// Score every wallet under `by`, then order and rank them.
pub fn rank_wallets(mut wallets: Vec<WalletView>, by: RankBy) -> Vec<WalletView> {
    for w in wallets.iter_mut() {
        w.rank_score = rank_score(w, by);
    }
    assign_ranks(wallets)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
