use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::kernel::{DocumentWrite, TimeRange};

/// Collection of report snapshots (store-generated ids)
pub const STATS_COLLECTION: &str = "stats";

/// Order aggregate over one reporting window
///
/// Written once per run and never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub total_orders: u64,
    /// Stored as a JSON number so other readers of `stats` see a numeric value
    #[serde(with = "revenue_number")]
    pub total_revenue: Decimal,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    /// Generation time, set by the store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

mod revenue_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{ser::Error, Deserialize, Deserializer, Serializer};

    /// Whole amounts become integers, fractional ones floats
    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let value = value.normalize();
        if value.scale() == 0 {
            if let Some(whole) = value.to_i64() {
                return serializer.serialize_i64(whole);
            }
        }
        let float = value
            .to_f64()
            .ok_or_else(|| S::Error::custom(format!("revenue {} out of range", value)))?;
        serializer.serialize_f64(float)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}

impl StatsSnapshot {
    pub fn new(total_orders: u64, total_revenue: Decimal, window: TimeRange) -> Self {
        Self {
            total_orders,
            total_revenue,
            window_start: window.start,
            window_end: window.end,
            timestamp: None,
        }
    }

    pub fn to_write(&self) -> Result<DocumentWrite> {
        Ok(DocumentWrite::from_model(self)?.server_timestamp("timestamp"))
    }
}
