//! Route definitions for the Rice Inspection platform

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Largest accepted measurement upload
pub const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Reference standards
        .route("/standards", get(handlers::list_standards))
        // Inspection history
        .nest("/history", history_routes())
        // Report view
        .route("/result/:id", get(handlers::get_report))
}

/// Inspection history routes
fn history_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_history)
                .post(handlers::create_inspection)
                .delete(handlers::delete_inspections),
        )
        .route(
            "/upload",
            post(handlers::upload_inspection).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route(
            "/:id",
            get(handlers::get_inspection)
                .put(handlers::update_inspection)
                .delete(handlers::delete_inspection),
        )
}
