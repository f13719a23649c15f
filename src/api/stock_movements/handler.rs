//! Stock Movement API Handlers

use axum::{Json, extract::State, http::StatusCode};

use crate::core::ServerState;
use crate::db::models::{StockMovement, StockMovementCreate, StockMovementDetail};
use crate::db::repository::StockMovementRepository;
use crate::utils::AppResult;

/// GET /api/stock-movements - all movements with product names resolved
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<StockMovementDetail>>> {
    let repo = StockMovementRepository::new(state.db.clone());
    let movements = repo.find_all_detailed().await?;
    Ok(Json(movements))
}

/// POST /api/stock-movements - record a movement and adjust the product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StockMovementCreate>,
) -> AppResult<(StatusCode, Json<StockMovement>)> {
    let repo = StockMovementRepository::new(state.db.clone());
    let movement = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(movement)))
}
