//! Typed string keys for compile-time type safety.
//!
//! Identity ids come from the identity provider and document ids from the
//! document store; both are opaque strings. `Id<T>` wraps the string so a
//! `UserId` cannot be passed where an `OrderId` was expected.
//!
//! # Example
//!
//! ```rust
//! use functions_core::common::id::Id;
//!
//! pub struct User;
//! pub struct Order;
//!
//! pub type UserId = Id<User>;
//! pub type OrderId = Id<Order>;
//!
//! let user_id = UserId::new("u1");
//! let order_id = OrderId::new("o1");
//!
//! // This would be a compile error:
//! // let wrong: OrderId = user_id;
//! # let _ = (user_id, order_id);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A typed wrapper around an opaque string key.
#[repr(transparent)]
pub struct Id<T>(String, PhantomData<fn() -> T>);

impl<T> Id<T> {
    /// Wraps a raw key.
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into(), PhantomData)
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the inner string.
    #[inline]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns `true` if the key is empty or whitespace only.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

// ============================================================================
// Standard trait implementations
// ============================================================================

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(&format!("Id<{}>", std::any::type_name::<T>()))
            .field(&self.0)
            .finish()
    }
}

impl<T> Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Hash for Id<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> AsRef<str> for Id<T> {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<T> From<String> for Id<T> {
    #[inline]
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl<T> From<&str> for Id<T> {
    #[inline]
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

// ============================================================================
// Serde support
// ============================================================================

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}
