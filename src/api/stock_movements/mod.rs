//! Stock Movement API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stock-movements", stock_movement_routes())
}

fn stock_movement_routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list).post(handler::create))
}
