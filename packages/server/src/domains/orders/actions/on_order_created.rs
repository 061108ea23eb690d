//! Order-created trigger - notifies the sellers on a new order

use futures::future::join_all;
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument, warn};

use crate::common::{validate_input, OrderId};
use crate::domains::notifications::NotificationRequest;
use crate::domains::orders::models::order::Order;
use crate::kernel::{DocumentWrite, ServerDeps};

/// Markers for trigger events that have already been handled
pub const TRIGGER_RECEIPTS_COLLECTION: &str = "triggerReceipts";

const NEW_ORDER_TITLE: &str = "New Order Received";

fn receipt_key(order_id: &OrderId) -> String {
    format!("orderCreated:{}", order_id)
}

/// Notify every seller referenced by a newly created order.
///
/// This action:
/// 1. Skips the order if a receipt shows it was already handled
/// 2. Validates `userId`, `items` and `totalAmount` on the raw document
/// 3. Sends one notification per distinct seller, all concurrently
/// 4. Writes the receipt
///
/// Nothing is re-signalled: an invalid order or failed delivery is logged
/// and dropped so the platform does not redeliver the event forever.
#[instrument(skip(order, deps), fields(order_id = %order_id))]
pub async fn on_order_created(order_id: OrderId, order: Value, deps: &ServerDeps) {
    let receipt = receipt_key(&order_id);

    match deps.documents.get(TRIGGER_RECEIPTS_COLLECTION, &receipt).await {
        Ok(Some(_)) => {
            debug!("Order already processed, skipping redelivery");
            return;
        }
        Ok(None) => {}
        // Without the receipt we cannot tell; notifying twice beats not at all
        Err(e) => warn!(error = %e, "Failed to read trigger receipt"),
    }

    if let Err(e) = validate_input(&order, &["userId", "items", "totalAmount"]) {
        error!(error = %e, "Invalid order");
        return;
    }

    let order: Order = match serde_json::from_value(order) {
        Ok(order) => order,
        Err(e) => {
            error!(error = %e, "Malformed order");
            return;
        }
    };

    let sellers = order.seller_ids();
    if sellers.len() < order.items.len() {
        debug!(
            sellers = sellers.len(),
            items = order.items.len(),
            "Some line items share a seller or carry none"
        );
    }

    let body = format!("Order #{} for {} items", order_id, order.items.len());
    let mut data = Map::new();
    data.insert("orderId".to_string(), json!(order_id));

    let requests: Vec<NotificationRequest> = sellers
        .into_iter()
        .map(|seller| {
            NotificationRequest::builder()
                .user_id(seller)
                .title(NEW_ORDER_TITLE)
                .body(body.clone())
                .data(data.clone())
                .build()
        })
        .collect();

    let outcomes = join_all(
        requests
            .iter()
            .map(|request| deps.notifications.send(request)),
    )
    .await;

    let mut failed = 0;
    for (request, outcome) in requests.iter().zip(&outcomes) {
        if let Err(e) = outcome {
            failed += 1;
            error!(seller_id = %request.user_id, error = %e, "Failed to notify seller");
        }
    }

    let write = DocumentWrite::new(Map::from_iter([
        ("orderId".to_string(), json!(order_id)),
        ("sellersNotified".to_string(), json!(requests.len() - failed)),
        ("sellersFailed".to_string(), json!(failed)),
    ]))
    .server_timestamp("processedAt");

    if let Err(e) = deps
        .documents
        .set(TRIGGER_RECEIPTS_COLLECTION, &receipt, write)
        .await
    {
        warn!(error = %e, "Failed to write trigger receipt");
    }

    info!(
        notified = requests.len() - failed,
        failed,
        "Order {} processed",
        order_id
    );
}
