//! Inspection store persisted as a JSON array on disk
//!
//! The file is read once when the store opens. Mutations go through a single
//! write lock and are flushed by writing a sibling temp file and renaming it
//! over the data file, so a crash never leaves a half-written array behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::memory::RecordIndex;
use super::InspectionStore;
use crate::error::{AppError, AppResult};
use shared::InspectionRecord;

pub struct JsonFileStore {
    path: PathBuf,
    index: RwLock<RecordIndex>,
}

impl JsonFileStore {
    /// Open the store, treating a missing or blank file as empty
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        let records = read_records(&path).await?;
        let (index, duplicates) = RecordIndex::from_records(records);

        for id in &duplicates {
            tracing::warn!("Skipping duplicate inspection {} in {}", id, path.display());
        }
        tracing::info!(
            "Loaded {} inspection(s) from {}",
            index.len(),
            path.display()
        );

        Ok(Self {
            path,
            index: RwLock::new(index),
        })
    }

    async fn persist(&self, index: &RecordIndex) -> AppResult<()> {
        let body = serde_json::to_vec_pretty(&index.ordered())
            .map_err(|e| AppError::StorageError(e.to_string()))?;

        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!("Persisted {} inspection(s) to {}", index.len(), self.path.display());
        Ok(())
    }
}

async fn read_records(path: &Path) -> AppResult<Vec<InspectionRecord>> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("{} not found, starting with an empty store", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&raw).map_err(|e| {
        AppError::StorageError(format!("Failed to parse {}: {}", path.display(), e))
    })
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "data.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait]
impl InspectionStore for JsonFileStore {
    async fn insert(&self, record: InspectionRecord) -> AppResult<()> {
        let id = record.id;
        let mut index = self.index.write().await;
        if !index.insert(record) {
            return Err(AppError::Internal(format!("Duplicate inspection ID {}", id)));
        }
        if let Err(e) = self.persist(&index).await {
            index.remove(&id);
            return Err(e);
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
        let mut index = self.index.write().await;
        let Some(previous) = index.replace(record) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&index).await {
            index.replace(previous);
            return Err(e);
        }
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut index = self.index.write().await;
        let Some((position, removed)) = index.remove(&id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist(&index).await {
            index.restore(position, removed);
            return Err(e);
        }
        Ok(true)
    }

    async fn count(&self) -> AppResult<usize> {
        Ok(self.index.read().await.len())
    }
}
