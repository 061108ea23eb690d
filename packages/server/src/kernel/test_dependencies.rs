// TestDependencies - mock implementations for testing
//
// Provides in-memory and recording collaborators that can be injected into
// ServerDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::{
    BaseDocumentStore, BaseIdentityStore, BaseNotificationDispatcher, BasePaymentProcessor,
    BasePushNotificationService, Document, DocumentStoreError, DocumentWrite, Identity,
    IdentityClaims, PaymentCharge, PaymentReceipt, ServerDeps, TimeRange,
};
use crate::common::UserId;
use crate::domains::notifications::NotificationRequest;

// =============================================================================
// In-memory Document Store
// =============================================================================

type Collections = HashMap<String, BTreeMap<String, Value>>;

pub struct InMemoryDocumentStore {
    collections: Arc<Mutex<Collections>>,
    operations: Arc<Mutex<Vec<String>>>,
    fail_writes: bool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(Mutex::new(HashMap::new())),
            operations: Arc::new(Mutex::new(Vec::new())),
            fail_writes: false,
        }
    }

    /// Every set/update/delete/add fails (reads still work)
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Seed a document without going through server timestamps
    pub fn with_document(self, collection: &str, id: &str, data: Value) -> Self {
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        self
    }

    /// Current body of a document
    pub fn document(&self, collection: &str, id: &str) -> Option<Value> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned()
    }

    /// All documents of a collection, ordered by id
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every operation performed, e.g. `"get orders/o1"`
    pub fn operations(&self) -> Vec<String> {
        self.operations.lock().unwrap().clone()
    }

    fn record(&self, operation: &str, collection: &str, id: &str) {
        self.operations
            .lock()
            .unwrap()
            .push(format!("{} {}/{}", operation, collection, id));
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("document store unavailable");
        }
        Ok(())
    }

    fn apply(write: DocumentWrite) -> serde_json::Map<String, Value> {
        let mut data = write.data;
        let now = serde_json::json!(Utc::now());
        for field in write.server_timestamps {
            data.insert(field, now.clone());
        }
        data
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseDocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.record("get", collection, id);
        Ok(self.document(collection, id).map(|data| Document {
            id: id.to_string(),
            data,
        }))
    }

    async fn set(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()> {
        self.record("set", collection, id);
        self.check_writable()?;
        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), Value::Object(Self::apply(write)));
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()> {
        self.record("update", collection, id);
        self.check_writable()?;
        let mut collections = self.collections.lock().unwrap();
        let Some(Value::Object(existing)) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
        else {
            return Err(DocumentStoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        };
        existing.extend(Self::apply(write));
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        self.record("delete", collection, id);
        self.check_writable()?;
        Ok(self
            .collections
            .lock()
            .unwrap()
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some())
    }

    async fn add(&self, collection: &str, write: DocumentWrite) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.set(collection, &id, write).await?;
        Ok(id)
    }

    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        range: TimeRange,
    ) -> Result<Vec<Document>> {
        self.record("query", collection, field);
        Ok(self
            .documents(collection)
            .into_iter()
            .filter(|doc| {
                doc.data
                    .get(field)
                    .and_then(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).ok())
                    .is_some_and(|stamp| range.contains(stamp))
            })
            .collect())
    }
}

// =============================================================================
// Mock Identity Store
// =============================================================================

pub struct MockIdentityStore {
    identities: Arc<Mutex<HashMap<UserId, Identity>>>,
    deleted: Arc<Mutex<Vec<UserId>>>,
    fail_deletes: bool,
}

impl MockIdentityStore {
    pub fn new() -> Self {
        Self {
            identities: Arc::new(Mutex::new(HashMap::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            fail_deletes: false,
        }
    }

    pub fn with_identity(self, identity: Identity) -> Self {
        self.identities
            .lock()
            .unwrap()
            .insert(identity.uid.clone(), identity);
        self
    }

    /// Every delete_identity call fails
    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    /// Uids passed to delete_identity (including failed attempts)
    pub fn delete_calls(&self) -> Vec<UserId> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn contains(&self, uid: &UserId) -> bool {
        self.identities.lock().unwrap().contains_key(uid)
    }
}

impl Default for MockIdentityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityStore for MockIdentityStore {
    async fn create_identity(&self, identity: Identity) -> Result<Identity> {
        self.identities
            .lock()
            .unwrap()
            .insert(identity.uid.clone(), identity.clone());
        Ok(identity)
    }

    async fn get_identity(&self, uid: &UserId) -> Result<Option<Identity>> {
        Ok(self.identities.lock().unwrap().get(uid).cloned())
    }

    async fn delete_identity(&self, uid: &UserId) -> Result<bool> {
        self.deleted.lock().unwrap().push(uid.clone());
        if self.fail_deletes {
            anyhow::bail!("identity service unavailable");
        }
        Ok(self.identities.lock().unwrap().remove(uid).is_some())
    }

    async fn get_claims(&self, uid: &UserId) -> Result<IdentityClaims> {
        Ok(self
            .identities
            .lock()
            .unwrap()
            .get(uid)
            .map(|identity| identity.custom_claims.clone())
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Notification Dispatcher
// =============================================================================

pub struct MockNotificationDispatcher {
    sent: Arc<Mutex<Vec<NotificationRequest>>>,
    failing_users: HashSet<UserId>,
}

impl MockNotificationDispatcher {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing_users: HashSet::new(),
        }
    }

    /// Deliveries to this user fail (they are still recorded)
    pub fn failing_for(mut self, user_id: &str) -> Self {
        self.failing_users.insert(UserId::new(user_id));
        self
    }

    /// Get all requests that were dispatched
    pub fn sent(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Requests addressed to a given user
    pub fn sent_to(&self, user_id: &str) -> Vec<NotificationRequest> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id.as_str() == user_id)
            .cloned()
            .collect()
    }
}

impl Default for MockNotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotificationDispatcher for MockNotificationDispatcher {
    async fn send(&self, request: &NotificationRequest) -> Result<()> {
        self.sent.lock().unwrap().push(request.clone());
        if self.failing_users.contains(&request.user_id) {
            anyhow::bail!("delivery to {} failed", request.user_id);
        }
        Ok(())
    }
}

// =============================================================================
// Mock Push Notification Service
// =============================================================================

pub struct MockPushNotificationService {
    sent_notifications: Arc<Mutex<Vec<(String, String, String, Value)>>>,
    fail: bool,
}

impl MockPushNotificationService {
    pub fn new() -> Self {
        Self {
            sent_notifications: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every send fails
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Get all notifications that were sent
    pub fn sent_notifications(&self) -> Vec<(String, String, String, Value)> {
        self.sent_notifications.lock().unwrap().clone()
    }
}

impl Default for MockPushNotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePushNotificationService for MockPushNotificationService {
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: Value,
    ) -> Result<()> {
        if self.fail {
            anyhow::bail!("push service unavailable");
        }
        self.sent_notifications.lock().unwrap().push((
            push_token.to_string(),
            title.to_string(),
            body.to_string(),
            data,
        ));
        Ok(())
    }
}

// =============================================================================
// Mock Payment Processor
// =============================================================================

pub struct MockPaymentProcessor {
    calls: Arc<Mutex<Vec<PaymentCharge>>>,
    counter: AtomicUsize,
    decline_reason: Option<String>,
}

impl MockPaymentProcessor {
    /// Confirms every charge with `tx_test_{n}`
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            counter: AtomicUsize::new(0),
            decline_reason: None,
        }
    }

    /// Rejects every charge with the given reason
    pub fn declining(mut self, reason: &str) -> Self {
        self.decline_reason = Some(reason.to_string());
        self
    }

    /// Get all charges that were submitted
    pub fn calls(&self) -> Vec<PaymentCharge> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockPaymentProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BasePaymentProcessor for MockPaymentProcessor {
    async fn process(&self, charge: PaymentCharge) -> Result<PaymentReceipt> {
        self.calls.lock().unwrap().push(charge);
        if let Some(reason) = &self.decline_reason {
            anyhow::bail!("Payment declined: {}", reason);
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PaymentReceipt {
            transaction_id: format!("tx_test_{}", n),
        })
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub documents: Arc<InMemoryDocumentStore>,
    pub identities: Arc<MockIdentityStore>,
    pub notifications: Arc<MockNotificationDispatcher>,
    pub payments: Arc<MockPaymentProcessor>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(InMemoryDocumentStore::new()),
            identities: Arc::new(MockIdentityStore::new()),
            notifications: Arc::new(MockNotificationDispatcher::new()),
            payments: Arc::new(MockPaymentProcessor::new()),
        }
    }

    /// Set a mock document store
    pub fn mock_documents(mut self, documents: InMemoryDocumentStore) -> Self {
        self.documents = Arc::new(documents);
        self
    }

    /// Set a mock identity store
    pub fn mock_identities(mut self, identities: MockIdentityStore) -> Self {
        self.identities = Arc::new(identities);
        self
    }

    /// Set a mock notification dispatcher
    pub fn mock_notifications(mut self, notifications: MockNotificationDispatcher) -> Self {
        self.notifications = Arc::new(notifications);
        self
    }

    /// Set a mock payment processor
    pub fn mock_payments(mut self, payments: MockPaymentProcessor) -> Self {
        self.payments = Arc::new(payments);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.documents.clone(),
            self.identities.clone(),
            self.notifications.clone(),
            self.payments.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
