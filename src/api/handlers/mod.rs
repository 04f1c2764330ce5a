pub mod health;
pub mod metrics;
pub mod refresh;
pub mod wallets;
pub mod watch;
