//! Document persistence for the two intake collections.
//!
//! Records travel through the store as JSON documents tagged with their id and
//! creation time, so backends only need to know how to keep a document and
//! how to return the newest ones first.

mod memory;
mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::domain::{ConsultationRequest, ContactSubmission, RecordId};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Upper bound applied by every list operation exposed over HTTP.
pub const LIST_LIMIT: usize = 100;

/// The two independent collections kept by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    ContactForms,
    ConsultationRequests,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::ContactForms, Collection::ConsultationRequests];

    pub fn name(self) -> &'static str {
        match self {
            Collection::ContactForms => "contact_forms",
            Collection::ConsultationRequests => "consultation_requests",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A record type that lives in exactly one collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> &RecordId;
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Document for ContactSubmission {
    const COLLECTION: Collection = Collection::ContactForms;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl Document for ConsultationRequest {
    const COLLECTION: Collection = Collection::ConsultationRequests;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Backend-neutral envelope around one serialized record.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    pub body: Value,
}

impl StoredDocument {
    pub fn encode<D: Document>(record: &D) -> Result<Self, StorageError> {
        let body = serde_json::to_value(record).map_err(|source| StorageError::Encoding {
            collection: D::COLLECTION,
            source,
        })?;

        Ok(Self {
            id: record.id().clone(),
            timestamp: record.timestamp(),
            body,
        })
    }

    pub fn decode<D: Document>(self) -> Result<D, StorageError> {
        serde_json::from_value(self.body).map_err(|source| StorageError::Encoding {
            collection: D::COLLECTION,
            source,
        })
    }
}

/// Storage abstraction shared by every request handler.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(
        &self,
        collection: Collection,
        document: StoredDocument,
    ) -> Result<(), StorageError>;

    /// Newest documents first, at most `limit` of them.
    async fn list_recent(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError>;

    async fn close(&self);
}

/// Typed helpers layered over the document-level store contract.
#[async_trait]
pub trait RecordStoreExt: RecordStore {
    async fn insert_record<D: Document>(&self, record: &D) -> Result<(), StorageError> {
        let document = StoredDocument::encode(record)?;
        self.insert(D::COLLECTION, document).await
    }

    async fn list_recent_records<D: Document>(&self, limit: usize) -> Result<Vec<D>, StorageError> {
        self.list_recent(D::COLLECTION, limit)
            .await?
            .into_iter()
            .map(StoredDocument::decode)
            .collect()
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}

/// Store selected at startup from the configured connection string.
pub enum StoreHandle {
    Memory(MemoryStore),
    Postgres(PostgresStore),
}

impl StoreHandle {
    pub fn backend(&self) -> &'static str {
        match self {
            StoreHandle::Memory(_) => "memory",
            StoreHandle::Postgres(_) => "postgres",
        }
    }
}

#[async_trait]
impl RecordStore for StoreHandle {
    async fn insert(
        &self,
        collection: Collection,
        document: StoredDocument,
    ) -> Result<(), StorageError> {
        match self {
            StoreHandle::Memory(store) => store.insert(collection, document).await,
            StoreHandle::Postgres(store) => store.insert(collection, document).await,
        }
    }

    async fn list_recent(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        match self {
            StoreHandle::Memory(store) => store.list_recent(collection, limit).await,
            StoreHandle::Postgres(store) => store.list_recent(collection, limit).await,
        }
    }

    async fn close(&self) {
        match self {
            StoreHandle::Memory(store) => store.close().await,
            StoreHandle::Postgres(store) => store.close().await,
        }
    }
}

/// Open the store described by the configuration.
pub async fn connect(config: &crate::config::StoreConfig) -> Result<StoreHandle, StorageError> {
    if config.is_memory() {
        tracing::info!(database = %config.database_name, "using in-memory record store");
        return Ok(StoreHandle::Memory(MemoryStore::default()));
    }

    let store = PostgresStore::connect(config).await?;
    Ok(StoreHandle::Postgres(store))
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode or decode {collection} document: {source}")]
    Encoding {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
