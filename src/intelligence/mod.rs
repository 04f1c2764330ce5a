pub mod activity;
pub mod classifier;
pub mod normalizer;
pub mod position_age;
pub mod ranking;
pub mod scorer;
pub mod stats;
pub mod wallet;
pub mod window_metrics;

pub use activity::{is_active, last_trade_at};
pub use classifier::{style_label, StyleTag};
pub use normalizer::normalize_positions;
pub use position_age::{apply_position_ages, infer_position_ages};
pub use ranking::{assign_ranks, rank_score, rank_wallets, RankBy};
pub use scorer::risk_score;
pub use stats::{max_drawdown_fraction, sample_std_dev};
pub use wallet::{build_wallet_view, live_overlay, portfolio_metrics};
pub use window_metrics::window_return_metrics;
