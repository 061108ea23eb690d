use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::UserId;
use crate::kernel::{DocumentWrite, Identity};

/// Collection holding one record per identity, keyed by uid
pub const USERS_COLLECTION: &str = "users";

/// Role of a user within the marketplace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Customer,
    Seller,
    Admin,
}

/// User record stored at `users/{uid}`
///
/// Timestamps are server-assigned, so they are absent on a record that has
/// been built but not yet written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default, rename = "photoURL")]
    pub photo_url: String,
    #[serde(default)]
    pub role: UserRole,
    /// Expo push token registered by the user's device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub push_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Fresh record for a newly provisioned identity
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            display_name: identity.display_name.clone().unwrap_or_default(),
            photo_url: identity.photo_url.clone().unwrap_or_default(),
            role: UserRole::Customer,
            push_token: None,
            created_at: None,
            last_login: None,
        }
    }

    /// Full overwrite of the record with both timestamps set by the store
    pub fn to_write(&self) -> Result<DocumentWrite> {
        Ok(DocumentWrite::from_model(self)?
            .server_timestamp("createdAt")
            .server_timestamp("lastLogin"))
    }
}
