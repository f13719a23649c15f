//! Settings API Handlers
//!
//! One settings document per installation; GET creates it on first access.

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{Settings, SettingsUpdate};
use crate::db::repository::SettingsRepository;
use crate::utils::AppResult;

/// GET /api/settings - the singleton, created with defaults when missing
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Settings>> {
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.get_or_create().await?;
    Ok(Json(settings))
}

/// PUT /api/settings - merge submitted fields into the singleton
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<SettingsUpdate>,
) -> AppResult<Json<Settings>> {
    let repo = SettingsRepository::new(state.db.clone());
    let settings = repo.update(payload).await?;
    Ok(Json(settings))
}
