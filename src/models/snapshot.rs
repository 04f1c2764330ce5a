use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WalletView;

/// Which half of a scan a wallet landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityMode {
    Active,
    Inactive,
}

impl ActivityMode {
    pub const ALL: [ActivityMode; 2] = [ActivityMode::Active, ActivityMode::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityMode::Active => "active",
            ActivityMode::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "active" => Some(ActivityMode::Active),
            "inactive" => Some(ActivityMode::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActivityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings and bookkeeping recorded alongside a scan's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanMeta {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub min_account_value: f64,
    pub active_days: i64,
    pub addresses_requested: usize,
    pub candidates: usize,
    pub failed_states: Vec<String>,
    pub failed_fills: Vec<String>,
    pub failed_portfolios: Vec<String>,
}

/// Result of one complete scan cycle. Replaced wholesale by the next
/// successful cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    pub meta: ScanMeta,
    pub active: Vec<WalletView>,
    pub inactive: Vec<WalletView>,
}

impl ScanSnapshot {
    pub fn wallets(&self, mode: ActivityMode) -> &[WalletView] {
        match mode {
            ActivityMode::Active => &self.active,
            ActivityMode::Inactive => &self.inactive,
        }
    }

    pub fn find(&self, address: &str) -> Option<&WalletView> {
        self.active
            .iter()
            .chain(self.inactive.iter())
            .find(|w| w.address.eq_ignore_ascii_case(address))
    }

    pub fn find_mut(&mut self, address: &str) -> Option<&mut WalletView> {
        self.active
            .iter_mut()
            .chain(self.inactive.iter_mut())
            .find(|w| w.address.eq_ignore_ascii_case(address))
    }
}
