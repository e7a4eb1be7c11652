//! Error handling for the Rice Inspection server
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::AggregationError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business logic errors
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    // External service errors
    #[error("External service error: {0}")]
    ExternalService(String),

    // Storage errors
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Field-level validation failure
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Aggregation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: match err {
                        AggregationError::ZeroTotalWeight => "ZERO_TOTAL_WEIGHT",
                        AggregationError::InvalidMeasurement { .. } => "INVALID_MEASUREMENT",
                        AggregationError::DuplicateRuleName(_) => "INVALID_STANDARD",
                    }
                    .to_string(),
                    message: err.to_string(),
                    field: Some("upload".to_string()),
                },
            ),
            AppError::ExternalService(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "EXTERNAL_SERVICE_ERROR".to_string(),
                    message: format!("External service error: {}", msg),
                    field: None,
                },
            ),
            AppError::StorageError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "STORAGE_ERROR".to_string(),
                    message: "Inspection data could not be read or saved".to_string(),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
