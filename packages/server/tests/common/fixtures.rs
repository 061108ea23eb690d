//! Payload builders and seeded stores for handler tests.

use chrono::{DateTime, Utc};
use functions_core::common::{CallerContext, UserId};
use functions_core::domains::orders::ORDERS_COLLECTION;
use functions_core::domains::users::USERS_COLLECTION;
use functions_core::kernel::test_dependencies::InMemoryDocumentStore;
use functions_core::kernel::{Identity, IdentityClaims};
use serde_json::{json, Value};

/// Order document placed by `user_id` with one line item per seller
pub fn order_json(user_id: &str, sellers: &[&str], total_amount: Value) -> Value {
    let items: Vec<Value> = sellers
        .iter()
        .enumerate()
        .map(|(i, seller)| {
            json!({ "sellerId": seller, "productId": format!("p{}", i + 1), "quantity": 1 })
        })
        .collect();

    json!({
        "userId": user_id,
        "items": items,
        "totalAmount": total_amount,
        "paymentStatus": "pending",
    })
}

/// Order created at `created_at` with the given total
pub fn order_at(created_at: DateTime<Utc>, total_amount: Value) -> Value {
    let mut order = order_json("buyer", &["seller"], total_amount);
    order["createdAt"] = json!(created_at);
    order
}

/// Store holding `orders/o1` owned by `u1` for 50
pub fn store_with_pending_order() -> InMemoryDocumentStore {
    InMemoryDocumentStore::new().with_document(
        ORDERS_COLLECTION,
        "o1",
        order_json("u1", &["s1"], json!(50)),
    )
}

/// Store holding the user record of `uid`
pub fn store_with_user(uid: &str) -> InMemoryDocumentStore {
    InMemoryDocumentStore::new().with_document(
        USERS_COLLECTION,
        uid,
        json!({ "uid": uid, "email": format!("{}@example.com", uid), "role": "customer" }),
    )
}

pub fn identity(uid: &str) -> Identity {
    Identity {
        uid: UserId::new(uid),
        email: Some(format!("{}@example.com", uid)),
        display_name: Some("Ada Lovelace".to_string()),
        photo_url: None,
        custom_claims: IdentityClaims::default(),
    }
}

pub fn customer(uid: &str) -> CallerContext {
    CallerContext::new(uid, false)
}

pub fn admin(uid: &str) -> CallerContext {
    CallerContext::new(uid, true)
}

pub fn payment_data(order_id: &str, amount: Value) -> Value {
    json!({ "amount": amount, "paymentMethod": "card", "orderId": order_id })
}
