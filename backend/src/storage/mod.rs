//! Keyed persistence for inspection records
//!
//! Records are addressed by their server-generated UUID. Each mutation is
//! applied to one record and persisted before the call returns.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use shared::InspectionRecord;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage backend for inspection records
#[async_trait]
pub trait InspectionStore: Send + Sync {
    /// Add a new record
    async fn insert(&self, record: InspectionRecord) -> AppResult<()>;

    /// Fetch one record by ID
    async fn get(&self, id: Uuid) -> AppResult<Option<InspectionRecord>>;

    /// All records in submission order
    async fn list(&self) -> AppResult<Vec<InspectionRecord>>;

    /// Replace an existing record; returns false if the ID is unknown
    async fn update(&self, record: InspectionRecord) -> AppResult<bool>;

    /// Remove a record; returns false if the ID is unknown
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Number of stored records
    async fn count(&self) -> AppResult<usize> {
        Ok(self.list().await?.len())
    }
}
