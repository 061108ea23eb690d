//! Orders domain - seller notification and payment settlement
//!
//! - `on_order_created`: tells every seller on a new order about it
//! - `process_payment`: settles an order through the payment service

pub mod actions;
pub mod models;

pub use actions::{on_order_created, process_payment};
pub use models::order::{LineItem, Order, PaymentStatus, ORDERS_COLLECTION};
pub use models::payment::{PaymentRequest, PaymentResult};
