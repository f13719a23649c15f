//! Order API Handlers
//!
//! Stock reconciliation lives in the repository; these handlers only shape
//! the HTTP surface.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderDetail, OrderUpdate};
use crate::db::repository::{OrderFilter, OrderRepository, parse_date_param};
use crate::utils::{AppResult, MessageResponse};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Paged listing body, references resolved
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderDetail>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// GET /api/orders - filtered, paged listing, newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(10).max(1);

    let filter = OrderFilter {
        search: query.search,
        status: query.status,
        payment_status: query.payment_status,
        start_date: query.start_date.as_deref().and_then(parse_date_param),
        end_date: query.end_date.as_deref().and_then(parse_date_param),
        page,
        limit,
    };

    let repo = OrderRepository::new(state.db.clone());
    let (orders, total) = repo.find_detailed_page(filter).await?;

    Ok(Json(OrderListResponse {
        orders,
        total,
        page,
        pages: total.div_ceil(limit),
    }))
}

/// POST /api/orders - create an order, deducting stock
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<Order>)> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create_order(payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// PUT /api/orders/:id - update an order, reconciling stock
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo.update_order(&id, payload).await?;
    Ok(Json(order))
}

/// DELETE /api/orders/:id - hard delete, stock is not restored
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = OrderRepository::new(state.db.clone());
    repo.delete_order(&id).await?;
    Ok(Json(MessageResponse::new("Order deleted")))
}
