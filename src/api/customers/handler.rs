//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate, Order};
use crate::db::repository::CustomerRepository;
use crate::utils::{AppError, AppResult, MessageResponse};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub phone: Option<String>,
}

/// Customer with their order history, newest first
#[derive(Debug, Serialize)]
pub struct CustomerWithOrders {
    pub customer: Customer,
    pub orders: Vec<Order>,
}

/// GET /api/customers - all customers
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Customer>>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customers = repo.find_all().await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id - customer plus their orders
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<CustomerWithOrders>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Customer not found"))?;
    let orders = repo.orders_for(&id).await?;
    Ok(Json(CustomerWithOrders { customer, orders }))
}

/// POST /api/customers - create a customer, duplicate phone/email rejected
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    payload.validate()?;
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers/search/phone?phone= - staged phone/name search
///
/// No match answers an empty array, not 404.
pub async fn search_by_phone(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let Some(term) = query.phone.filter(|t| !t.is_empty()) else {
        return Err(AppError::validation("Phone number or name is required"));
    };

    let repo = CustomerRepository::new(state.db.clone());
    let customers = repo.search_by_phone(&term).await?;
    Ok(Json(customers))
}

/// PUT /api/customers/:id - field merge update
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    let repo = CustomerRepository::new(state.db.clone());
    let customer = repo.update(&id, payload).await?;
    Ok(Json(customer))
}

/// DELETE /api/customers/:id - hard delete
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let repo = CustomerRepository::new(state.db.clone());
    repo.delete(&id).await?;
    Ok(Json(MessageResponse::new("Customer deleted")))
}
