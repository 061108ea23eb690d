//! Orders domain actions

mod on_order_created;
mod process_payment;

pub use on_order_created::{on_order_created, TRIGGER_RECEIPTS_COLLECTION};
pub use process_payment::process_payment;
