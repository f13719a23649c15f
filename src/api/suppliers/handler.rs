//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use crate::db::repository::SupplierRepository;
use crate::utils::{AppError, AppResult, MessageResponse};

/// GET /api/suppliers - all suppliers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    let repo = SupplierRepository::new(state.db.clone());
    let suppliers = repo.find_all().await?;
    Ok(Json(suppliers))
}

/// GET /api/suppliers/:id - single supplier
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let repo = SupplierRepository::new(state.db.clone());
    let supplier = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Supplier not found"))?;
    Ok(Json(supplier))
}

/// POST /api/suppliers - create a supplier
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    payload.validate()?;
    let repo = SupplierRepository::new(state.db.clone());
    let supplier = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

/// PUT /api/suppliers/:id - field merge update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SupplierUpdate>,
) -> AppResult<Json<Supplier>> {
    let repo = SupplierRepository::new(state.db.clone());
    let supplier = repo.update(&id, payload).await?;
    Ok(Json(supplier))
}

/// DELETE /api/suppliers/:id - hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = SupplierRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(MessageResponse::new("Supplier deleted successfully")))
}
