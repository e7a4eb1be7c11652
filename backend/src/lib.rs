//! Rice Inspection Platform - Backend
//!
//! Records rice-grain inspections: grades uploaded grain measurements against
//! a reference standard and serves the stored reports over HTTP.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};

use external::StandardsClient;
use storage::InspectionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InspectionStore>,
    pub standards: StandardsClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn InspectionStore>,
        standards: StandardsClient,
        config: Config,
    ) -> Self {
        Self {
            store,
            standards,
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Rice Inspection Platform API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
