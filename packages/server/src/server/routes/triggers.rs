//! Event trigger endpoints
//!
//! The event source posts the event payload and retries on any non-2xx
//! answer. Only handlers that re-signal failures ever answer 500.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::common::OrderId;
use crate::domains::orders::on_order_created;
use crate::domains::stats::daily_stats_report;
use crate::domains::users::on_identity_created;
use crate::kernel::Identity;
use crate::server::app::AppState;

/// An identity was created: provision the user record
pub async fn identity_created_handler(
    Extension(state): Extension<AppState>,
    Json(identity): Json<Identity>,
) -> StatusCode {
    match on_identity_created(identity, &state.deps).await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// An order document was created: notify its sellers (best effort)
pub async fn order_created_handler(
    Extension(state): Extension<AppState>,
    Path(order_id): Path<String>,
    Json(order): Json<Value>,
) -> StatusCode {
    on_order_created(OrderId::new(order_id), order, &state.deps).await;
    StatusCode::OK
}

/// Run the daily stats job now (best effort)
pub async fn daily_stats_handler(Extension(state): Extension<AppState>) -> StatusCode {
    daily_stats_report(&state.deps).await;
    StatusCode::OK
}
