// HTTP middleware
pub mod jwt_auth;
pub mod trigger_secret;

pub use jwt_auth::*;
pub use trigger_secret::*;
