//! Auth API module
//!
//! Login is public; the profile routes sit behind the bearer middleware.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", auth_routes())
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route(
            "/profile",
            get(handler::get_profile).put(handler::update_profile),
        )
}
