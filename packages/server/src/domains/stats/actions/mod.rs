mod daily_stats_report;

pub use daily_stats_report::{daily_stats_report, generate_daily_stats};
