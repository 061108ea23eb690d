//! Users domain - user records derived from identities
//!
//! - `on_identity_created`: provisions the user record and welcomes the user
//! - `cleanup_user_data`: admin-only removal of a user's record and identity

pub mod actions;
pub mod models;

pub use actions::{cleanup_user_data, on_identity_created, CleanupResult};
pub use models::user_record::{UserRecord, UserRole, USERS_COLLECTION};
