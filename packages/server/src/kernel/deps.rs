//! Server dependencies for handlers (using traits for testability)
//!
//! `ServerDeps` is built once at process start and passed explicitly into
//! every handler. It only holds read-only capability handles; no handler
//! keeps state in it between invocations.

use std::sync::Arc;

use crate::kernel::{
    BaseDocumentStore, BaseIdentityStore, BaseNotificationDispatcher, BasePaymentProcessor,
};

/// Server dependencies accessible to handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub documents: Arc<dyn BaseDocumentStore>,
    pub identities: Arc<dyn BaseIdentityStore>,
    pub notifications: Arc<dyn BaseNotificationDispatcher>,
    pub payments: Arc<dyn BasePaymentProcessor>,
}

impl ServerDeps {
    pub fn new(
        documents: Arc<dyn BaseDocumentStore>,
        identities: Arc<dyn BaseIdentityStore>,
        notifications: Arc<dyn BaseNotificationDispatcher>,
        payments: Arc<dyn BasePaymentProcessor>,
    ) -> Self {
        Self {
            documents,
            identities,
            notifications,
            payments,
        }
    }
}
