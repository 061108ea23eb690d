use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::UserId;

/// Collection holding orders, keyed by order id
pub const ORDERS_COLLECTION: &str = "orders";

/// Payment state of an order
///
/// Moves from `Pending` to `Completed` only through payment settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(default)]
    pub seller_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// Order document stored at `orders/{orderId}`
///
/// Orders are written by clients; this service only reads them and sets the
/// payment fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub user_id: UserId,
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Distinct sellers referenced by the line items, in first-seen order
    pub fn seller_ids(&self) -> Vec<UserId> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter_map(|item| item.seller_id.as_ref())
            .filter(|seller| !seller.is_blank())
            .filter(|seller| seen.insert(*seller))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn order(items: serde_json::Value) -> Order {
        serde_json::from_value(json!({
            "userId": "u1",
            "items": items,
            "totalAmount": 42,
        }))
        .unwrap()
    }

    #[test]
    fn test_seller_ids_are_distinct() {
        let order = order(json!([
            {"sellerId": "A"},
            {"sellerId": "B"},
            {"sellerId": "A"},
            {"sellerId": "C"},
        ]));

        let sellers: Vec<String> = order
            .seller_ids()
            .into_iter()
            .map(|s| s.into_string())
            .collect();
        assert_eq!(sellers, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_items_without_seller_are_ignored() {
        let order = order(json!([{"productId": "p1"}, {"sellerId": ""}, {"sellerId": "s1"}]));
        assert_eq!(order.seller_ids(), vec![UserId::new("s1")]);
    }

    #[test]
    fn test_defaults_to_pending() {
        let order = order(json!([]));
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from(42));
    }

    #[test]
    fn test_amount_accepts_decimal_strings() {
        let order: Order = serde_json::from_value(json!({
            "userId": "u1",
            "items": [],
            "totalAmount": "19.99",
            "paymentStatus": "completed",
        }))
        .unwrap();

        assert_eq!(order.total_amount.to_string(), "19.99");
        assert_eq!(order.payment_status, PaymentStatus::Completed);
    }
}
