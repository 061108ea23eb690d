// Common types and utilities shared across the application

pub mod auth;
pub mod entity_ids;
pub mod errors;
pub mod id;
pub mod utils;
pub mod validation;

pub use auth::{Actor, AuthError, CallerContext, Capability};
pub use entity_ids::*;
pub use errors::HandlerError;
pub use id::Id;
pub use validation::{sanitize_data, validate_input, ValidationError};
