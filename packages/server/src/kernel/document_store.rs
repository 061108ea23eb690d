//! Postgres-backed document store.
//!
//! Every collection lives in the single `documents` table keyed by
//! `(collection, id)`. Server timestamps are applied inside the statement
//! with `now()`, so the database clock is the only clock that stamps data.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{BaseDocumentStore, Document, DocumentStoreError, DocumentWrite, TimeRange};

/// JSON object mapping each server-timestamp field to the statement time
const STAMPS_SQL: &str =
    "COALESCE((SELECT jsonb_object_agg(f, to_jsonb(now())) FROM unnest($4::text[]) AS f), '{}'::jsonb)";

#[derive(sqlx::FromRow, Debug)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Self {
            id: row.id,
            data: row.data.0,
        }
    }
}

pub struct PostgresDocumentStore {
    pool: PgPool,
}

impl PostgresDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()> {
        let sql = format!(
            "INSERT INTO documents (collection, id, data)
             VALUES ($1, $2, $3 || {stamps})
             ON CONFLICT (collection, id)
             DO UPDATE SET data = EXCLUDED.data, updated_at = NOW()",
            stamps = STAMPS_SQL
        );

        sqlx::query(&sql)
            .bind(collection)
            .bind(id)
            .bind(Json(Value::Object(write.data)))
            .bind(&write.server_timestamps)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to write document {}/{}", collection, id))?;

        Ok(())
    }
}

#[async_trait]
impl BaseDocumentStore for PostgresDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to read document {}/{}", collection, id))?;

        Ok(row.map(Document::from))
    }

    async fn set(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()> {
        self.upsert(collection, id, write).await
    }

    async fn update(&self, collection: &str, id: &str, write: DocumentWrite) -> Result<()> {
        let sql = format!(
            "UPDATE documents
             SET data = data || $3 || {stamps}, updated_at = NOW()
             WHERE collection = $1 AND id = $2",
            stamps = STAMPS_SQL
        );

        let result = sqlx::query(&sql)
            .bind(collection)
            .bind(id)
            .bind(Json(Value::Object(write.data)))
            .bind(&write.server_timestamps)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to update document {}/{}", collection, id))?;

        if result.rows_affected() == 0 {
            return Err(DocumentStoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete document {}/{}", collection, id))?;

        Ok(result.rows_affected() > 0)
    }

    async fn add(&self, collection: &str, write: DocumentWrite) -> Result<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.upsert(collection, &id, write).await?;
        debug!("Added document {}/{}", collection, id);
        Ok(id)
    }

    async fn query_range(
        &self,
        collection: &str,
        field: &str,
        range: TimeRange,
    ) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM (
                 SELECT id, data,
                        CASE WHEN jsonb_typeof(data -> $2) = 'string'
                             THEN try_timestamptz(data ->> $2)
                        END AS stamp
                 FROM documents
                 WHERE collection = $1
             ) d
             WHERE stamp > $3 AND stamp <= $4
             ORDER BY stamp, id",
        )
        .bind(collection)
        .bind(field)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Failed to query {} by {}", collection, field))?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}
