//! Reference standards client
//!
//! Fetches the published `standards.json` (or reads a local copy) and caches
//! the parsed list for the lifetime of the process.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use reqwest::Client;
use shared::Standard;
use tokio::sync::RwLock;

use crate::config::StandardsConfig;
use crate::error::{AppError, AppResult};

#[derive(Clone)]
enum StandardsSource {
    Remote { client: Client, url: String },
    LocalFile(PathBuf),
    Fixed,
}

/// Client for the reference standards dataset
#[derive(Clone)]
pub struct StandardsClient {
    source: StandardsSource,
    cache: Arc<RwLock<Option<Arc<Vec<Standard>>>>>,
}

impl StandardsClient {
    /// Create a client from configuration
    pub fn new(config: &StandardsConfig) -> AppResult<Self> {
        let source = match &config.local_path {
            Some(path) => StandardsSource::LocalFile(path.clone()),
            None => {
                let client = Client::builder()
                    .timeout(Duration::from_secs(config.timeout_secs))
                    .build()
                    .map_err(|e| {
                        AppError::Configuration(format!("Failed to create HTTP client: {}", e))
                    })?;
                StandardsSource::Remote {
                    client,
                    url: config.url.clone(),
                }
            }
        };

        Ok(Self {
            source,
            cache: Arc::new(RwLock::new(None)),
        })
    }

    /// Client serving a fixed list, never touching the network
    pub fn fixed(standards: Vec<Standard>) -> Self {
        Self {
            source: StandardsSource::Fixed,
            cache: Arc::new(RwLock::new(Some(Arc::new(standards)))),
        }
    }

    /// All standards, fetched on first use
    pub async fn list(&self) -> AppResult<Arc<Vec<Standard>>> {
        if let Some(cached) = self.cache.read().await.as_ref() {
            return Ok(cached.clone());
        }
        self.refresh().await
    }

    /// Re-read the source and replace the cache
    pub async fn refresh(&self) -> AppResult<Arc<Vec<Standard>>> {
        let standards = match &self.source {
            StandardsSource::Remote { client, url } => Arc::new(fetch_remote(client, url).await?),
            StandardsSource::LocalFile(path) => Arc::new(read_local(path).await?),
            StandardsSource::Fixed => {
                return self
                    .cache
                    .read()
                    .await
                    .clone()
                    .ok_or_else(|| AppError::Internal("Standards cache is empty".to_string()));
            }
        };

        tracing::info!("Loaded {} standard(s)", standards.len());
        *self.cache.write().await = Some(standards.clone());
        Ok(standards)
    }

    /// Find a standard by ID or display name
    pub async fn find(&self, id_or_name: &str) -> AppResult<Option<Standard>> {
        let standards = self.list().await?;
        Ok(standards.iter().find(|s| s.is_named(id_or_name)).cloned())
    }
}

async fn fetch_remote(client: &Client, url: &str) -> AppResult<Vec<Standard>> {
    tracing::debug!("Fetching standards from {}", url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::ExternalService(format!("Standards request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::ExternalService(format!(
            "Standards source returned {}",
            status
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::ExternalService(format!("Failed to parse standards: {}", e)))
}

async fn read_local(path: &Path) -> AppResult<Vec<Standard>> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::Configuration(format!("Cannot read standards file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        AppError::Configuration(format!("Invalid standards file {}: {}", path.display(), e))
    })
}
