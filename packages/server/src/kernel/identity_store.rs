//! Postgres-backed identity store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{BaseIdentityStore, Identity, IdentityClaims};
use crate::common::UserId;

#[derive(sqlx::FromRow, Debug)]
struct IdentityRow {
    uid: String,
    email: Option<String>,
    display_name: Option<String>,
    photo_url: Option<String>,
    custom_claims: Json<IdentityClaims>,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            uid: UserId::new(row.uid),
            email: row.email,
            display_name: row.display_name,
            photo_url: row.photo_url,
            custom_claims: row.custom_claims.0,
        }
    }
}

pub struct PostgresIdentityStore {
    pool: PgPool,
}

impl PostgresIdentityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BaseIdentityStore for PostgresIdentityStore {
    async fn create_identity(&self, identity: Identity) -> Result<Identity> {
        sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO identities (uid, email, display_name, photo_url, custom_claims)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (uid) DO UPDATE SET
                email = EXCLUDED.email,
                display_name = EXCLUDED.display_name,
                photo_url = EXCLUDED.photo_url,
                custom_claims = EXCLUDED.custom_claims
             RETURNING uid, email, display_name, photo_url, custom_claims",
        )
        .bind(identity.uid.as_str())
        .bind(&identity.email)
        .bind(&identity.display_name)
        .bind(&identity.photo_url)
        .bind(Json(&identity.custom_claims))
        .fetch_one(&self.pool)
        .await
        .map(Identity::from)
        .with_context(|| format!("Failed to create identity {}", identity.uid))
    }

    async fn get_identity(&self, uid: &UserId) -> Result<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT uid, email, display_name, photo_url, custom_claims
             FROM identities WHERE uid = $1",
        )
        .bind(uid.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read identity {}", uid))?;

        Ok(row.map(Identity::from))
    }

    async fn delete_identity(&self, uid: &UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM identities WHERE uid = $1")
            .bind(uid.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete identity {}", uid))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_claims(&self, uid: &UserId) -> Result<IdentityClaims> {
        Ok(self
            .get_identity(uid)
            .await?
            .map(|identity| identity.custom_claims)
            .unwrap_or_default())
    }
}
