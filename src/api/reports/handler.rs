//! Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{InventoryRow, SalesRow};
use crate::db::repository::{OrderRepository, ProductRepository, parse_date_param};
use crate::utils::AppResult;
use crate::utils::money::sum_money;

/// Products at or below this quantity count as low stock
const LOW_STOCK_THRESHOLD: i64 = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub pending_orders: i64,
    pub low_stock_products: i64,
    pub total_products: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/reports/dashboard - headline numbers
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    let orders = OrderRepository::new(state.db.clone());
    let products = ProductRepository::new(state.db.clone());

    let total_revenue = sum_money(orders.all_totals().await?);
    // Statuses are stored lowercase, so this capitalized comparison matches
    // nothing and the count stays 0 (source behavior, kept)
    let pending_orders = orders.count_by_status("Pending").await?;
    let low_stock_products = products.count_low_stock(LOW_STOCK_THRESHOLD).await?;
    let total_products = products.count_all().await?;

    Ok(Json(DashboardStats {
        total_revenue,
        pending_orders,
        low_stock_products,
        total_products,
    }))
}

/// GET /api/reports/sales - orders with customer names resolved
///
/// The date range only applies when both bounds are present.
pub async fn sales(
    State(state): State<ServerState>,
    Query(query): Query<SalesQuery>,
) -> AppResult<Json<Vec<SalesRow>>> {
    let (start, end) = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(start), Some(end)) => (parse_date_param(start), parse_date_param(end)),
        _ => (None, None),
    };

    let repo = OrderRepository::new(state.db.clone());
    let rows = repo.sales_rows(start, end).await?;
    Ok(Json(rows))
}

/// GET /api/reports/inventory - per-product stock and price projection
pub async fn inventory(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryRow>>> {
    let repo = ProductRepository::new(state.db.clone());
    let rows = repo.inventory_rows().await?;
    Ok(Json(rows))
}
