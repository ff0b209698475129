//! Payee handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};

use super::{read_json, SortQuery};
use crate::{AppError, AppState, SuccessResponse};
use budgetline_core::models::{NewPayee, Payee};
use budgetline_core::{parse_sort, PayeeManager, PayeeSortField};

/// GET /api/payees - List payees
pub async fn list_payees(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortQuery>,
) -> Result<Json<Vec<Payee>>, AppError> {
    let sort = parse_sort::<PayeeSortField>(params.sort.as_deref())?;
    Ok(Json(PayeeManager::new(&state.db).list(sort)?))
}

/// GET /api/payees/:id - Get a payee
pub async fn get_payee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Payee>, AppError> {
    Ok(Json(PayeeManager::new(&state.db).get(Some(id))?))
}

/// POST /api/payees - Create a payee
pub async fn create_payee(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Payee>, AppError> {
    let new: NewPayee = read_json(request.into_body()).await?;
    Ok(Json(PayeeManager::new(&state.db).add(new)?))
}

/// PUT /api/payees/:id - Replace a payee
pub async fn update_payee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Payee>, AppError> {
    let payee: Payee = read_json(request.into_body()).await?;
    Ok(Json(PayeeManager::new(&state.db).update(id, payee)?))
}

/// DELETE /api/payees/:id - Delete a payee and its aliases
pub async fn delete_payee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    PayeeManager::new(&state.db).remove(id)?;
    Ok(Json(SuccessResponse { success: true }))
}
