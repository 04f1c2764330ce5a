pub mod export;
pub mod live_refresh;
pub mod scanner;
