//! Alias handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use serde::Deserialize;

use super::{read_json, SortQuery};
use crate::{AppError, AppState, SuccessResponse};
use budgetline_core::models::{Alias, NewAlias, Payee};
use budgetline_core::{parse_sort, AliasManager, AliasSortField};

/// GET /api/aliases - List aliases
pub async fn list_aliases(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortQuery>,
) -> Result<Json<Vec<Alias>>, AppError> {
    let sort = parse_sort::<AliasSortField>(params.sort.as_deref())?;
    Ok(Json(AliasManager::new(&state.db).list(sort)?))
}

/// GET /api/aliases/:id - Get an alias
pub async fn get_alias(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Alias>, AppError> {
    Ok(Json(AliasManager::new(&state.db).get(Some(id))?))
}

/// POST /api/aliases - Create an alias
pub async fn create_alias(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Alias>, AppError> {
    let new: NewAlias = read_json(request.into_body()).await?;
    Ok(Json(AliasManager::new(&state.db).add(new)?))
}

/// PUT /api/aliases/:id - Replace an alias
pub async fn update_alias(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Alias>, AppError> {
    let alias: Alias = read_json(request.into_body()).await?;
    Ok(Json(AliasManager::new(&state.db).update(id, alias)?))
}

/// DELETE /api/aliases/:id - Delete an alias
pub async fn delete_alias(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    AliasManager::new(&state.db).remove(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Query parameters for alias resolution
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// Raw payee string as it appears on a statement
    pub name: String,
}

/// GET /api/aliases/resolve - Map a statement string to its payee
pub async fn resolve_alias(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<Payee>, AppError> {
    AliasManager::new(&state.db)
        .resolve(&params.name)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(&format!("No payee matches '{}'", params.name.trim())))
}
