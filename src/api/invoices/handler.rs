//! Invoice API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceDetail, InvoiceUpdate};
use crate::db::repository::InvoiceRepository;
use crate::utils::{AppResult, MessageResponse};

/// GET /api/invoices - all invoices with their orders resolved
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InvoiceDetail>>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoices = repo.find_all_detailed().await?;
    Ok(Json(invoices))
}

/// POST /api/invoices - create an invoice for an order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InvoiceCreate>,
) -> AppResult<(StatusCode, Json<Invoice>)> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

/// PUT /api/invoices/:id - field merge update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<InvoiceUpdate>,
) -> AppResult<Json<Invoice>> {
    let repo = InvoiceRepository::new(state.db.clone());
    let invoice = repo.update(&id, payload).await?;
    Ok(Json(invoice))
}

/// DELETE /api/invoices/:id - hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = InvoiceRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(MessageResponse::new("Invoice deleted")))
}
