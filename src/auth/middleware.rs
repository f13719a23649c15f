//! Authentication Middleware
//!
//! Provides the Axum middleware for JWT authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{JwtError, JwtService};
use crate::core::ServerState;
use crate::db::models::User;
use crate::db::repository::UserRepository;
use crate::security_log;
use crate::utils::AppError;

/// Current user context injected into request extensions by [`require_auth`]
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub role: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            email: user.email.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            role: user.role.clone(),
        }
    }
}

/// Authentication middleware
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`, then
/// resolves the token subject against the user table. The stored user is
/// injected as a [`CurrentUser`] request extension.
///
/// # Paths that skip authentication
///
/// - `OPTIONS *` (CORS preflight)
/// - anything outside `/api/`
/// - `POST /api/auth/login`
/// - `GET /api/health`
/// - `/api/products*` and `/api/categories*` (public catalog)
///
/// # Errors
///
/// | Failure | Response |
/// |---------|----------|
/// | Missing Authorization header | 401 Unauthorized |
/// | Expired token | 401 TokenExpired |
/// | Malformed/invalid token | 401 InvalidToken |
/// | Token subject no longer stored | 401 Unauthorized |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight OPTIONS requests
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes return 404 normally
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    let is_public_api_route = path == "/api/auth/login"
        || path == "/api/health"
        || path.starts_with("/api/products")
        || path.starts_with("/api/categories");
    if is_public_api_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
            return Err(AppError::Unauthorized);
        }
    };

    let claims = match jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );

            return match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            };
        }
    };

    // The subject must still resolve to a stored user
    let users = UserRepository::new(state.get_db());
    let Some(user) = users.find_by_id(&claims.sub).await? else {
        security_log!("WARN", "auth_unknown_user", sub = claims.sub.clone());
        return Err(AppError::Unauthorized);
    };

    let current = CurrentUser::from(&user);

    tracing::info!(
        user_id = %current.id,
        email = %current.email,
        role = %current.role,
        "User authenticated successfully"
    );

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}
