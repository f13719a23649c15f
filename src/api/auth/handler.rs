//! Auth API Handlers
//!
//! Only admin accounts may log in. The login and profile-update responses
//! share one flat shape: the user's fields at the top level plus a freshly
//! issued token.

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{ProfileUpdate, User, UserPublic};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Flat user payload with a token, returned by login and profile updates
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: String,
    pub token: String,
}

impl AuthResponse {
    fn from_user(user: &User, token: String) -> Self {
        Self {
            id: user.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            phone: user.phone.clone(),
            address: user.address.clone(),
            avatar: user.avatar.clone(),
            role: user.role.clone(),
            token,
        }
    }
}

fn issue_token(state: &ServerState, user: &User) -> Result<String, AppError> {
    let user_id = user.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    state
        .jwt_service
        .generate_token(user_id, user.email.clone())
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))
}

/// POST /api/auth/login - credential login
///
/// Unknown email and wrong password both answer 401 with the same message.
/// Non-admin accounts are rejected with 403 even on correct credentials.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let Some(user) = repo.find_by_email(&payload.email).await? else {
        return Err(AppError::InvalidCredentials);
    };

    let valid = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    if !user.is_admin {
        return Err(AppError::forbidden("Access denied. Admins only."));
    }

    let token = issue_token(&state, &user)?;
    tracing::info!(email = %user.email, "User logged in");
    Ok(Json(AuthResponse::from_user(&user, token)))
}

/// GET /api/auth/profile - current user, password hash excluded
pub async fn get_profile(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<Json<UserPublic>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user.public()))
}

/// PUT /api/auth/profile - merge submitted fields and reissue the token
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<AuthResponse>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.update_profile(&current.id, payload).await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse::from_user(&user, token)))
}
