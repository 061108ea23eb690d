use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::OrderId;

/// Payload of the `processPayment` callable
///
/// Carries no user id: the payer is always the verified caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub payment_method: String,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResult {
    pub success: bool,
    pub transaction_id: String,
}
