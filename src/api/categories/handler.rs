//! Category API Handlers
//!
//! Success bodies here are wrapped in a `{success, data, ...}` envelope,
//! unlike the rest of the API. Errors use the shared error body.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub include_inactive: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryListEnvelope {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Category>,
}

#[derive(Debug, Serialize)]
pub struct CategoryEnvelope {
    pub success: bool,
    pub data: Category,
}

#[derive(Debug, Serialize)]
pub struct CategoryDeletedEnvelope {
    pub success: bool,
    pub message: &'static str,
    pub data: Category,
}

/// GET /api/categories - active categories sorted by name
///
/// `includeInactive=true` lifts the active filter.
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<CategoryListEnvelope>> {
    let include_inactive = query.include_inactive.as_deref() == Some("true");
    let repo = CategoryRepository::new(state.db.clone());
    let categories = repo.find_all(include_inactive).await?;
    Ok(Json(CategoryListEnvelope {
        success: true,
        count: categories.len(),
        data: categories,
    }))
}

/// GET /api/categories/:id - single category
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryEnvelope>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Category not found"))?;
    Ok(Json(CategoryEnvelope {
        success: true,
        data: category,
    }))
}

/// POST /api/categories - create, rejecting case-insensitive duplicate names
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<(StatusCode, Json<CategoryEnvelope>)> {
    payload.validate()?;
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(CategoryEnvelope {
            success: true,
            data: category,
        }),
    ))
}

/// PUT /api/categories/:id - update, duplicate-name check excludes self
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<CategoryEnvelope>> {
    payload.validate()?;
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.update(&id, payload).await?;
    Ok(Json(CategoryEnvelope {
        success: true,
        data: category,
    }))
}

/// DELETE /api/categories/:id - soft delete, returns the deactivated document
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryDeletedEnvelope>> {
    let repo = CategoryRepository::new(state.db.clone());
    let category = repo.delete(&id).await?;
    Ok(Json(CategoryDeletedEnvelope {
        success: true,
        message: "Category deleted successfully",
        data: category,
    }))
}
