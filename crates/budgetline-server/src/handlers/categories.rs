//! Budget category handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::{read_json, SortQuery};
use crate::{AppError, AppState, SuccessResponse};
use budgetline_core::models::{BudgetCategory, NewBudgetCategory};
use budgetline_core::{parse_sort, CategoryManager, CategorySortField};

/// GET /api/categories - List every category record
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SortQuery>,
) -> Result<Json<Vec<BudgetCategory>>, AppError> {
    let sort = parse_sort::<CategorySortField>(params.sort.as_deref())?;
    let categories = CategoryManager::new(&state.db).list(sort)?;
    Ok(Json(categories))
}

/// GET /api/categories/:id - Get one category record
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<BudgetCategory>, AppError> {
    Ok(Json(CategoryManager::new(&state.db).get(Some(id))?))
}

/// POST /api/categories - Create a category record
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<Json<BudgetCategory>, AppError> {
    let new: NewBudgetCategory = read_json(request.into_body()).await?;
    let category = CategoryManager::new(&state.db).add(new)?;
    Ok(Json(category))
}

/// Request body for editing a category
#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub category: BudgetCategory,
    /// First day the edited values apply (YYYY-MM-DD)
    pub effective_date: NaiveDate,
}

/// PUT /api/categories/:id - Edit a category from an effective date on
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    request: Request,
) -> Result<Json<BudgetCategory>, AppError> {
    let req: UpdateCategoryRequest = read_json(request.into_body()).await?;
    let category =
        CategoryManager::new(&state.db).update(id, req.category, req.effective_date)?;

    info!(id, effective_date = %req.effective_date, "Category updated via API");
    Ok(Json(category))
}

/// DELETE /api/categories/:id - Delete a category record
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, AppError> {
    CategoryManager::new(&state.db).remove(id)?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Query parameters for the active-categories view
#[derive(Debug, Deserialize)]
pub struct ActiveQuery {
    /// Day to inspect (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/categories/active - Category records in effect on a day
pub async fn active_categories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ActiveQuery>,
) -> Result<Json<Vec<BudgetCategory>>, AppError> {
    let date = match params.date.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            AppError::bad_request(&format!("Invalid date: {}. Expected YYYY-MM-DD", s))
        })?,
        None => chrono::Local::now().date_naive(),
    };
    let sort = parse_sort::<CategorySortField>(params.sort.as_deref())?;

    let categories = CategoryManager::new(&state.db).active_on(date, sort)?;
    Ok(Json(categories))
}

/// Query parameters for category history
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub name: String,
}

/// GET /api/categories/history - Every slice of a category name
pub async fn category_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<BudgetCategory>>, AppError> {
    Ok(Json(CategoryManager::new(&state.db).history(&params.name)?))
}
