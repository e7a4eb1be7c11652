//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::services::InspectionService;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspections: Option<usize>,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check storage readability
    let service = InspectionService::new(state.store.clone(), state.standards.clone());
    let (storage, inspections) = match service.count().await {
        Ok(count) => ("available".to_string(), Some(count)),
        Err(_) => ("unavailable".to_string(), None),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        storage,
        inspections,
    })
}
