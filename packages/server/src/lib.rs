// Marketplace Functions - Core
//
// Event handlers for the marketplace backend: identity provisioning, order
// notifications, payment settlement, the daily stats job and admin cleanup.
// Every collaborator (documents, identities, push delivery, payments) sits
// behind a trait in `kernel` and is injected through `ServerDeps`.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
