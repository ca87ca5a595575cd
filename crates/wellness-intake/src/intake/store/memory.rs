use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Collection, RecordStore, StorageError, StoredDocument};

/// Process-local store used for development runs and tests.
#[derive(Default, Clone)]
pub struct MemoryStore {
    collections: Arc<Mutex<HashMap<Collection, Vec<StoredDocument>>>>,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(StorageError::Unavailable("store has been closed".to_string()));
        }
        Ok(())
    }

    fn poisoned() -> StorageError {
        StorageError::Unavailable("store mutex poisoned".to_string())
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .lock()
            .map(|guard| guard.get(&collection).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(
        &self,
        collection: Collection,
        document: StoredDocument,
    ) -> Result<(), StorageError> {
        self.ensure_open()?;
        let mut guard = self.collections.lock().map_err(|_| Self::poisoned())?;
        guard.entry(collection).or_default().push(document);
        Ok(())
    }

    async fn list_recent(
        &self,
        collection: Collection,
        limit: usize,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        self.ensure_open()?;
        let guard = self.collections.lock().map_err(|_| Self::poisoned())?;
        let Some(documents) = guard.get(&collection) else {
            return Ok(Vec::new());
        };

        // Reverse first so the stable sort keeps later inserts ahead on ties.
        let mut recent: Vec<StoredDocument> = documents.iter().rev().cloned().collect();
        recent.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
