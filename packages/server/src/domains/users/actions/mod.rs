//! Users domain actions - one async function per handler
//!
//! Each action receives its payload and `&ServerDeps` and returns either a
//! plain result or a `HandlerError` for the trigger source/callable client.

mod cleanup_user_data;
mod on_identity_created;

pub use cleanup_user_data::{cleanup_user_data, CleanupResult};
pub use on_identity_created::on_identity_created;
