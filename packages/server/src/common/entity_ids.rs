//! Typed key definitions for domain entities.
//!
//! ```rust
//! use functions_core::common::{OrderId, UserId};
//!
//! let user_id = UserId::new("u1");
//! let order_id = OrderId::new("o1");
//! # let _ = (user_id, order_id);
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for user identities (buyers, sellers and admins alike).
pub struct User;

/// Marker type for Order documents.
pub struct Order;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Identity id as issued by the identity provider.
pub type UserId = Id<User>;

/// Document id of an order.
pub type OrderId = Id<Order>;
