//! Stats domain - the daily order report

pub mod actions;
pub mod models;

pub use actions::{daily_stats_report, generate_daily_stats};
pub use models::stats_snapshot::{StatsSnapshot, STATS_COLLECTION};
