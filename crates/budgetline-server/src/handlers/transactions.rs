//! Transaction handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};

use super::{read_json, SortQuery};
use crate::{AppError, AppState, SuccessResponse};
use budgetline_core::models::{BudgetCategory, NewTransaction, Transaction};
use budgetline_core::{parse_sort, TransactionManager, TransactionSortField};

/// GET /api/transactions - List transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let sort = parse_sort::<TransactionSortField>(params.sort.as_deref())?;
    Ok(Json(TransactionManager::new(&state.db).list(sort)?))
}

/// GET /api/transactions/:id - Get a transaction
pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, AppError> {
    Ok(Json(TransactionManager::new(&state.db).get(Some(id))?))
}

/// POST /api/transactions - Record a transaction
pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let new: NewTransaction = read_json(request.into_body()).await?;
    Ok(Json(TransactionManager::new(&state.db).add(new)?))
}

/// PUT /api/transactions/:id - Replace a transaction
pub async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<Transaction>, AppError> {
    let transaction: Transaction = read_json(request.into_body()).await?;
    Ok(Json(
        TransactionManager::new(&state.db).update(id, transaction)?,
    ))
}

/// DELETE /api/transactions/:id - Delete a transaction
pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    TransactionManager::new(&state.db).remove(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/transactions/:id/category - The category a transaction counts against
///
/// Returns `null` for an uncategorized transaction.
pub async fn get_transaction_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Option<BudgetCategory>>, AppError> {
    Ok(Json(
        TransactionManager::new(&state.db).resolve_category(id)?,
    ))
}
