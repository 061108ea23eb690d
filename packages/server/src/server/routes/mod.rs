// HTTP routes
pub mod callable;
pub mod health;
pub mod triggers;

pub use callable::*;
pub use health::*;
pub use triggers::*;
