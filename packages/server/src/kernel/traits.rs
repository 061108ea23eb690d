// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Handlers in domains/* receive them through ServerDeps.
//
// Naming convention: Base* for trait names (e.g., BaseDocumentStore)

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::common::{OrderId, UserId};
use crate::domains::notifications::NotificationRequest;

// =============================================================================
// Document Store Trait (Infrastructure - keyed JSON documents)
// =============================================================================

/// A stored document: its key within the collection plus its JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Deserialize the document body into a typed model
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone())
            .with_context(|| format!("Malformed document {}", self.id))
    }
}

/// Body of a write plus the fields the store stamps with its own clock
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentWrite {
    pub data: Map<String, Value>,
    pub server_timestamps: Vec<String>,
}

impl DocumentWrite {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            server_timestamps: Vec::new(),
        }
    }

    /// Build a write from any model that serializes to a JSON object
    pub fn from_model<T: Serialize>(model: &T) -> Result<Self> {
        match serde_json::to_value(model).context("Failed to serialize document")? {
            Value::Object(data) => Ok(Self::new(data)),
            other => anyhow::bail!("Document body must be an object, got {}", other),
        }
    }

    /// Ask the store to set `field` to its current time when applying the write
    pub fn server_timestamp(mut self, field: &str) -> Self {
        self.data.remove(field);
        self.server_timestamps.push(field.to_string());
        self
    }
}

/// Half-open time window `(start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// The window of length `length` ending at `end`
    pub fn trailing(end: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: end - length,
            end,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant > self.start && instant <= self.end
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentStoreError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
}

#[async_trait]
pub trait BaseDocumentStore: Send + Sync {
    /// Read a document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Create or overwrite the document at `id`
    async fn set(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()>;

    /// Merge top-level fields into an existing document
    ///
    /// Fails with [`DocumentStoreError::NotFound`] if the document is missing.
    async fn update(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()>;

    /// Delete a document, returning whether it existed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;

    /// Insert a document under a store-generated id
    async fn add(&self, collection: &str, write: DocumentWrite) -> Result<String>;

    /// Documents whose timestamp `field` falls inside `range`
    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        range: TimeRange,
    ) -> Result<Vec<Document>>;

    /// Cheap reachability probe for health checks
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Identity Store Trait (Infrastructure - authentication accounts)
// =============================================================================

/// Custom claims attached to an identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub admin: bool,
}

/// An authentication account as delivered by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub uid: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub custom_claims: IdentityClaims,
}

#[async_trait]
pub trait BaseIdentityStore: Send + Sync {
    /// Provision an identity (overwrites an existing one with the same uid)
    async fn create_identity(&self, identity: Identity) -> Result<Identity>;

    async fn get_identity(&self, uid: &UserId) -> Result<Option<Identity>>;

    /// Revoke an identity, returning whether it existed
    async fn delete_identity(&self, uid: &UserId) -> Result<bool>;

    /// Claim set of an identity (default claims if the identity is unknown)
    async fn get_claims(&self, uid: &UserId) -> Result<IdentityClaims>;
}

// =============================================================================
// Notification Traits (Infrastructure)
// =============================================================================

/// Delivers a notification addressed to a user (fire-and-forget)
#[async_trait]
pub trait BaseNotificationDispatcher: Send + Sync {
    async fn send(&self, request: &NotificationRequest) -> Result<()>;
}

/// Device-level push delivery
#[async_trait]
pub trait BasePushNotificationService: Send + Sync {
    /// Send a push notification to a push token
    async fn send_notification(
        &self,
        push_token: &str,
        title: &str,
        body: &str,
        data: Value,
    ) -> Result<()>;
}

// =============================================================================
// Payment Processor Trait (Infrastructure - external settlement)
// =============================================================================

/// A charge submitted to the payment collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCharge {
    pub user_id: UserId,
    pub amount: Decimal,
    pub method: String,
    pub order_id: OrderId,
}

/// Settlement confirmation from the payment collaborator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub transaction_id: String,
}

#[async_trait]
pub trait BasePaymentProcessor: Send + Sync {
    /// Settle a charge; any error means the charge was not confirmed
    async fn process(&self, charge: PaymentCharge) -> Result<PaymentReceipt>;
}
