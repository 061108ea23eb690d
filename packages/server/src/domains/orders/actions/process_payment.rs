//! processPayment callable - settles an order through the payment service

use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument, warn};

use crate::common::{
    sanitize_data, validate_input, Actor, AuthError, CallerContext, Capability, HandlerError,
};
use crate::domains::orders::models::order::{Order, PaymentStatus, ORDERS_COLLECTION};
use crate::domains::orders::models::payment::{PaymentRequest, PaymentResult};
use crate::kernel::{DocumentWrite, PaymentCharge, ServerDeps};

/// Pay for one of the caller's orders.
///
/// This action:
/// 1. Requires a verified caller (`unauthenticated` otherwise, with no
///    collaborator touched)
/// 2. Validates and sanitizes the payload before any collaborator call
/// 3. Loads the order, checks the caller owns it and that the amount
///    matches the order total
/// 4. Charges the caller (never a payload-supplied user) through the
///    payment service
/// 5. Only after the charge is confirmed, marks the order `completed`
///
/// A declined or failed charge leaves the order untouched. An order that is
/// already `completed` returns its transaction id without a second charge,
/// so a retried call cannot double-charge.
#[instrument(skip(data, caller, deps), fields(caller = ?caller.map(|c| c.uid.as_str())))]
pub async fn process_payment(
    mut data: Value,
    caller: Option<&CallerContext>,
    deps: &ServerDeps,
) -> Result<PaymentResult, HandlerError> {
    let caller = Actor::new(caller)
        .can(Capability::ProcessPayment)
        .check()?;

    // Validate after sanitizing so a field that sanitizes to nothing counts as missing
    sanitize_data(&mut data)
        .and_then(|_| validate_input(&data, &["amount", "paymentMethod", "orderId"]))
        .map_err(|e| {
            warn!(error = %e, "Rejected payment payload");
            HandlerError::internal(e.to_string())
        })?;

    let request: PaymentRequest = serde_json::from_value(data)
        .map_err(|e| HandlerError::internal(format!("Invalid payment request: {}", e)))?;

    if request.amount <= Decimal::ZERO {
        return Err(HandlerError::internal(
            "Invalid field amount: must be positive",
        ));
    }

    let document = deps
        .documents
        .get(ORDERS_COLLECTION, request.order_id.as_str())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to load order");
            HandlerError::internal(e.to_string())
        })?
        .ok_or_else(|| HandlerError::internal(format!("Order {} not found", request.order_id)))?;

    let order: Order = document.parse().map_err(|e| {
        error!(error = %e, "Malformed order");
        HandlerError::internal(e.to_string())
    })?;

    if order.user_id != caller.uid {
        return Err(AuthError::PermissionDenied("order belongs to another user".to_string()).into());
    }

    if order.payment_status == PaymentStatus::Completed {
        return match order.transaction_id {
            Some(transaction_id) => {
                info!(order_id = %request.order_id, "Order already paid, returning stored transaction");
                Ok(PaymentResult {
                    success: true,
                    transaction_id,
                })
            }
            None => Err(HandlerError::internal(format!(
                "Order {} is already paid",
                request.order_id
            ))),
        };
    }

    if request.amount != order.total_amount {
        warn!(
            order_id = %request.order_id,
            requested = %request.amount,
            total = %order.total_amount,
            "Payment amount differs from order total"
        );
        return Err(HandlerError::internal(format!(
            "Payment amount {} does not match order total {}",
            request.amount, order.total_amount
        )));
    }

    let receipt = deps
        .payments
        .process(PaymentCharge {
            user_id: caller.uid.clone(),
            amount: request.amount,
            method: request.payment_method,
            order_id: request.order_id.clone(),
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Payment processing error");
            HandlerError::internal(e.to_string())
        })?;

    let update = DocumentWrite::new(Map::from_iter([
        ("paymentStatus".to_string(), json!(PaymentStatus::Completed)),
        ("transactionId".to_string(), json!(receipt.transaction_id)),
    ]))
    .server_timestamp("updatedAt");

    deps.documents
        .update(ORDERS_COLLECTION, request.order_id.as_str(), update)
        .await
        .map_err(|e| {
            // The charge went through; the transaction id is needed to reconcile
            error!(
                transaction_id = %receipt.transaction_id,
                error = %e,
                "Charge confirmed but order status update failed"
            );
            HandlerError::internal(e.to_string())
        })?;

    info!(
        order_id = %request.order_id,
        transaction_id = %receipt.transaction_id,
        "Payment completed"
    );

    Ok(PaymentResult {
        success: true,
        transaction_id: receipt.transaction_id,
    })
}
