pub mod stats_snapshot;
