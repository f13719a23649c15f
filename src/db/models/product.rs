//! Product Model
//!
//! `quantity` is the authoritative stock count. `in_stock` is a stored flag
//! that catalog writes and stock movements recompute but order stock math
//! deliberately leaves alone, so the two can diverge (kept from the source
//! system).

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub buying_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating a product
///
/// Numeric fields default to 0 when omitted; `in_stock` is recomputed as
/// `requested || quantity > 0`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub buying_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub quantity: Option<i64>,
    pub in_stock: Option<bool>,
    pub image_url: Option<String>,
}

/// Payload for updating a product
///
/// Mirrors the source semantics: text fields are merged only when supplied,
/// but numeric fields fall back to 0 when omitted and `in_stock` is always
/// recomputed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub buying_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub quantity: Option<i64>,
    pub in_stock: Option<bool>,
    pub image_url: Option<String>,
}

/// Row shape for the inventory report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRow {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub buying_price: f64,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub in_stock: bool,
}
