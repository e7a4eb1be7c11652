//! HTTP handlers for reference standards

use axum::{extract::State, Json};
use shared::Standard;

use crate::error::AppResult;
use crate::AppState;

/// List the standards an inspection can be graded against
pub async fn list_standards(State(state): State<AppState>) -> AppResult<Json<Vec<Standard>>> {
    let standards = state.standards.list().await?;
    Ok(Json(standards.as_ref().clone()))
}
