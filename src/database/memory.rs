use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Document;
use crate::database::repository::{duplicate_name, not_found, EntryFilter, Record, Repository};

/// Process-local store keeping documents in insertion order
pub struct MemoryRepository<T> {
    records: RwLock<Vec<Record<T>>>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> Repository<T> for MemoryRepository<T> {
    async fn list(&self, filter: EntryFilter) -> Result<Vec<Record<T>>, DatabaseError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| filter.matches(&r.document))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Record<T>, DatabaseError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| not_found::<T>(id))
    }

    async fn insert(&self, document: T) -> Result<Record<T>, DatabaseError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.document.name() == document.name()) {
            return Err(duplicate_name::<T>(document.name()));
        }

        let record = Record::new(Uuid::new_v4(), document);
        records.push(record.clone());
        Ok(record)
    }

    async fn save(&self, record: &Record<T>) -> Result<(), DatabaseError> {
        let mut records = self.records.write().await;
        if records
            .iter()
            .any(|r| r.id != record.id && r.document.name() == record.document.name())
        {
            return Err(duplicate_name::<T>(record.document.name()));
        }

        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| not_found::<T>(record.id))?;
        *slot = record.clone();
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut records = self.records.write().await;
        let position = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| not_found::<T>(id))?;
        records.remove(position);
        Ok(())
    }
}
