use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::Document;

/// A stored document together with the id the store assigned to it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub document: T,
}

impl<T> Record<T> {
    pub fn new(id: Uuid, document: T) -> Self {
        Self { id, document }
    }
}

/// Which documents a listing returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub include_deprecated: bool,
}

impl EntryFilter {
    pub fn active() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Self {
            include_deprecated: true,
        }
    }

    pub fn matches<T: Document>(&self, document: &T) -> bool {
        self.include_deprecated || !document.is_deprecated()
    }
}

/// Storage seam shared by every collection. Names are unique per collection.
#[async_trait]
pub trait Repository<T: Document>: Send + Sync {
    /// Documents matching the filter, in store order
    async fn list(&self, filter: EntryFilter) -> Result<Vec<Record<T>>, DatabaseError>;

    /// Fails with `NotFound` when the id does not resolve
    async fn get_by_id(&self, id: Uuid) -> Result<Record<T>, DatabaseError>;

    /// Stores a new document under a freshly generated id
    async fn insert(&self, document: T) -> Result<Record<T>, DatabaseError>;

    /// Overwrites an existing document
    async fn save(&self, record: &Record<T>) -> Result<(), DatabaseError>;

    /// Permanently deletes a document
    async fn remove(&self, id: Uuid) -> Result<(), DatabaseError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Record<T>>, DatabaseError> {
        let records = self.list(EntryFilter::all()).await?;
        Ok(records.into_iter().find(|r| r.document.name() == name))
    }

    /// Connectivity check used by the health endpoint
    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

pub(crate) fn not_found<T: Document>(id: Uuid) -> DatabaseError {
    DatabaseError::NotFound(format!("No entry with id '{}' in {}", id, T::COLLECTION))
}

pub(crate) fn duplicate_name<T: Document>(name: &str) -> DatabaseError {
    DatabaseError::Conflict(format!(
        "An entry named '{}' already exists in {}",
        name,
        T::COLLECTION
    ))
}
