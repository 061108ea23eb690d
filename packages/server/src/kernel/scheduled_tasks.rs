//! Scheduled background tasks using tokio-cron-scheduler.
//!
//! ```text
//! Scheduler (every 24 hours)
//!     │
//!     └─► daily_stats_report()
//!             └─► query orders in trailing window → add stats snapshot
//! ```
//!
//! A failed run is logged by the job itself and waits for the next tick.

use anyhow::{Context, Result};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::domains::stats::daily_stats_report;
use crate::kernel::ServerDeps;

/// Start all scheduled tasks
pub async fn start_scheduler(deps: ServerDeps, daily_stats_cron: &str) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new()
        .await
        .context("Failed to create job scheduler")?;

    let stats_job = Job::new_async(daily_stats_cron, move |_uuid, _lock| {
        let deps = deps.clone();
        Box::pin(async move {
            daily_stats_report(&deps).await;
        })
    })
    .with_context(|| format!("Invalid daily stats schedule: {}", daily_stats_cron))?;

    scheduler
        .add(stats_job)
        .await
        .context("Failed to register daily stats job")?;
    scheduler
        .start()
        .await
        .context("Failed to start job scheduler")?;

    tracing::info!("Scheduled tasks started (daily stats: {})", daily_stats_cron);
    Ok(scheduler)
}
