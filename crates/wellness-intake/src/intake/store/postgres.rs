use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use super::{Collection, RecordStore, StorageError, StoredDocument};
use crate::config::StoreConfig;
use crate::intake::domain::RecordId;

/// JSONB-backed document store. One table per collection.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect to the configured server and database, creating the
    /// collection tables when they do not exist yet.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StorageError> {
        let options = PgConnectOptions::from_str(&config.url)?.database(&config.database_name);
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        let store = Self::from_pool(pool);
        store.ensure_collections().await?;
        tracing::info!(
            database = %config.database_name,
            max_connections = config.max_connections,
            "connected to postgres record store"
        );
        Ok(store)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn ensure_collections(&self) -> Result<(), StorageError> {
        for collection in Collection::ALL {
            let table = collection.name();
            let create = format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    seq BIGSERIAL NOT NULL,
                    id TEXT PRIMARY KEY,
                    recorded_at TIMESTAMPTZ NOT NULL,
                    document JSONB NOT NULL
                )"
            );
            sqlx::query(&create).execute(&self.pool).await?;

            let index = format!(
                "CREATE INDEX IF NOT EXISTS {table}_recorded_at_idx ON {table} (recorded_at DESC, seq DESC)"
            );
            sqlx::query(&index).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn insert(
        &self,
        collection: Collection,
        document: StoredDocument,
    ) -> Result<(), StorageError> {
        let statement = format!(
            "INSERT INTO {} (id, recorded_at, document) VALUES ($1, $2, $3)",
            collection.name()
        );
        sqlx::query(&statement)
            .bind(document.id.0)
            .bind(document.timestamp)
            .bind(Json(document.body))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_recent(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        let statement = format!(
            "SELECT id, recorded_at, document FROM {} ORDER BY recorded_at DESC, seq DESC LIMIT $1",
            collection.name()
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query(&statement)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<StoredDocument, StorageError> {
                let id: String = row.try_get("id")?;
                let timestamp: DateTime<Utc> = row.try_get("recorded_at")?;
                let Json(body): Json<Value> = row.try_get("document")?;
                Ok(StoredDocument {
                    id: RecordId(id),
                    timestamp,
                    body,
                })
            })
            .collect()
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
