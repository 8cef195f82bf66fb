use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use keyhole_core::repository::{AccessRecord, ReadRepository, RecordKey, Repository, Result};
use keyhole_core::{ContextTag, StorageError};
use std::collections::BTreeSet;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so concurrent lookups of different keys do not
/// block each other. Expired records are dropped lazily when touched.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<RecordKey, AccessRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored records, expired ones included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, key: &RecordKey) -> Result<Option<AccessRecord>> {
        let Some(record) = self.storage.get(key) else {
            return Ok(None);
        };

        if record.is_expired() {
            drop(record);
            self.storage.remove_if(key, |_, record| record.is_expired());
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }

    async fn exists(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn contains_link(&self, link: &str) -> Result<bool> {
        Ok(self
            .storage
            .iter()
            .any(|entry| !entry.is_expired() && entry.carries_link(link)))
    }

    async fn contexts(&self) -> Result<Vec<ContextTag>> {
        let contexts: BTreeSet<ContextTag> = self
            .storage
            .iter()
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.key().context.clone())
            .collect();

        Ok(contexts.into_iter().collect())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, key: &RecordKey, record: AccessRecord) -> Result<()> {
        // An expired record no longer occupies its key.
        match self.storage.entry(key.clone()) {
            Entry::Occupied(mut existing) if existing.get().is_expired() => {
                existing.insert(record);
                Ok(())
            }
            Entry::Occupied(_) => Err(StorageError::Conflict(format!(
                "access code already registered in context '{}'",
                key.context
            ))),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn delete(&self, key: &RecordKey) -> Result<bool> {
        Ok(self.storage.remove(key).is_some())
    }
}
