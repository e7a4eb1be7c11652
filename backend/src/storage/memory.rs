//! In-process record index and the non-persistent store built on it

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::InspectionStore;
use crate::error::{AppError, AppResult};
use shared::InspectionRecord;

/// Records keyed by ID, remembering submission order
#[derive(Debug, Default)]
pub(crate) struct RecordIndex {
    records: HashMap<Uuid, InspectionRecord>,
    order: Vec<Uuid>,
}

impl RecordIndex {
    /// Build from a loaded list. Later duplicates of an ID are dropped and
    /// reported back.
    pub(crate) fn from_records(records: Vec<InspectionRecord>) -> (Self, Vec<Uuid>) {
        let mut index = Self::default();
        let mut duplicates = Vec::new();
        for record in records {
            let id = record.id;
            if !index.insert(record) {
                duplicates.push(id);
            }
        }
        (index, duplicates)
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn get(&self, id: &Uuid) -> Option<&InspectionRecord> {
        self.records.get(id)
    }

    pub(crate) fn ordered(&self) -> Vec<&InspectionRecord> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .collect()
    }

    /// Returns false when the ID already exists
    pub(crate) fn insert(&mut self, record: InspectionRecord) -> bool {
        if self.records.contains_key(&record.id) {
            return false;
        }
        self.order.push(record.id);
        self.records.insert(record.id, record);
        true
    }

    /// Returns the previous version, or None when the ID is unknown
    pub(crate) fn replace(&mut self, record: InspectionRecord) -> Option<InspectionRecord> {
        match self.records.get_mut(&record.id) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => None,
        }
    }

    /// Returns the removed record and its position
    pub(crate) fn remove(&mut self, id: &Uuid) -> Option<(usize, InspectionRecord)> {
        let record = self.records.remove(id)?;
        let position = self.order.iter().position(|o| o == id)?;
        self.order.remove(position);
        Some((position, record))
    }

    /// Undo a removal
    pub(crate) fn restore(&mut self, position: usize, record: InspectionRecord) {
        let position = position.min(self.order.len());
        self.order.insert(position, record.id);
        self.records.insert(record.id, record);
    }
}

/// Store that lives only as long as the process
#[derive(Default)]
pub struct MemoryStore {
    index: RwLock<RecordIndex>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InspectionStore for MemoryStore {
    async fn insert(&self, record: InspectionRecord) -> AppResult<()> {
        let id = record.id;
        if !self.index.write().await.insert(record) {
            return Err(AppError::Internal(format!("Duplicate inspection ID {}", id)));
        }
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<InspectionRecord>> {
        Ok(self.index.read().await.get(&id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<InspectionRecord>> {
        Ok(self
            .index
            .read()
            .await
            .ordered()
            .into_iter()
            .cloned()
            .collect())
    }

    async fn update(&self, record: InspectionRecord) -> AppResult<bool> {
        Ok(self.index.write().await.replace(record).is_some())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.index.write().await.remove(&id).is_some())
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.index.read().await.len())
    }
}
