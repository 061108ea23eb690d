// Business domains
pub mod auth;
pub mod notifications;
pub mod orders;
pub mod stats;
pub mod users;
