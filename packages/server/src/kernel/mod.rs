//! Kernel module - collaborator traits, their implementations and the
//! dependency container handed to every handler.

pub mod deps;
pub mod document_store;
pub mod identity_store;
pub mod payment_client;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use document_store::PostgresDocumentStore;
pub use identity_store::PostgresIdentityStore;
pub use payment_client::PaymentServiceClient;
pub use scheduled_tasks::start_scheduler;
pub use test_dependencies::TestDependencies;
pub use traits::*;
