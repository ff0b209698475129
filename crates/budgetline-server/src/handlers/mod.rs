//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::de::DeserializeOwned;

use crate::{AppError, AppState, MAX_BODY_SIZE};
use budgetline_core::models::StoreStats;

pub mod aliases;
pub mod categories;
pub mod payees;
pub mod transactions;

// Re-export all handlers for use in router
pub use aliases::*;
pub use categories::*;
pub use payees::*;
pub use transactions::*;

/// Query parameter shared by every list endpoint: `?sort=field[:desc]`
#[derive(Debug, Default, serde::Deserialize)]
pub struct SortQuery {
    pub sort: Option<String>,
}

/// Read a JSON request body, reporting malformed input as 400
pub(crate) async fn read_json<T: DeserializeOwned>(body: axum::body::Body) -> Result<T, AppError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_SIZE)
        .await
        .map_err(|_| AppError::bad_request("Invalid request body"))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// GET /api/health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/stats - Row counts per table
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StoreStats>, AppError> {
    Ok(Json(state.db.stats()?))
}
