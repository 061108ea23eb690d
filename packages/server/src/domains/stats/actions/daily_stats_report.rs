//! Scheduled job - daily order count and revenue

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{error, info, instrument, warn};

use crate::domains::orders::models::order::ORDERS_COLLECTION;
use crate::domains::stats::models::stats_snapshot::{StatsSnapshot, STATS_COLLECTION};
use crate::kernel::{ServerDeps, TimeRange};

/// Build and store the snapshot for the 24 hours ending at `now`.
///
/// Every order in the window counts towards `totalOrders`; an order whose
/// `totalAmount` cannot be read adds nothing to `totalRevenue`.
/// Returns the id of the stored snapshot.
pub async fn generate_daily_stats(
    deps: &ServerDeps,
    now: DateTime<Utc>,
) -> Result<(String, StatsSnapshot)> {
    let window = TimeRange::trailing(now, Duration::hours(24));

    let orders = deps
        .documents
        .query_range(ORDERS_COLLECTION, "createdAt", window)
        .await
        .context("Failed to query orders")?;

    let mut total_revenue = Decimal::ZERO;
    for order in &orders {
        let amount = order
            .data
            .get("totalAmount")
            .cloned()
            .map(serde_json::from_value::<Decimal>);

        match amount {
            Some(Ok(amount)) => total_revenue += amount,
            Some(Err(e)) => warn!(order_id = %order.id, error = %e, "Unreadable order amount"),
            None => warn!(order_id = %order.id, "Order without amount"),
        }
    }

    let snapshot = StatsSnapshot::new(orders.len() as u64, total_revenue, window);

    let id = deps
        .documents
        .add(STATS_COLLECTION, snapshot.to_write()?)
        .await
        .context("Failed to store stats snapshot")?;

    Ok((id, snapshot))
}

/// Scheduled entry point.
///
/// Failures are logged only; a missed report is neither retried nor
/// escalated.
#[instrument(skip(deps))]
pub async fn daily_stats_report(deps: &ServerDeps) {
    match generate_daily_stats(deps, Utc::now()).await {
        Ok((id, snapshot)) => info!(
            snapshot_id = %id,
            total_orders = snapshot.total_orders,
            total_revenue = %snapshot.total_revenue,
            "Daily stats report generated"
        ),
        Err(e) => error!(error = %e, "Error in daily stats report"),
    }
}
