//! Order Model
//!
//! An order embeds its line items. A line item may reference a catalog
//! product (participates in stock accounting) or be an ad-hoc entry with a
//! name and price only.

use super::customer::CustomerRef;
use super::serde_helpers;
use super::{Customer, Product};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order fulfillment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    Delivered,
    Hold,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Order payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    Partial,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Unpaid
    }
}

/// One entry in an order's product list
///
/// `product` is optional: custom items carry only a display name, quantity
/// and price, and never touch stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub product: Option<RecordId>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Order entity as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,
    #[serde(default)]
    pub products: Vec<LineItem>,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating an order
///
/// `customer` and `products` stay optional at the type level so the engine
/// can report a missing-field validation error instead of a decode failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub customer: Option<RecordId>,
    pub products: Option<Vec<LineItem>>,
    pub total_amount: Option<f64>,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub notes: Option<String>,
}

/// Payload for updating an order (full-document field merge)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(
        default,
        with = "serde_helpers::option_record_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub customer: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<LineItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
}

/// Line item with the product reference resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemDetail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
}

/// Order with customer and product references resolved for list responses
///
/// Dangling references (deleted customer or product) resolve to `None`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    pub products: Vec<LineItemDetail>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Order row for the sales report, customer trimmed to id and name
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesRow {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub customer: Option<CustomerRef>,
    pub products: Vec<LineItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Unpaid).unwrap(),
            r#""unpaid""#
        );
    }

    #[test]
    fn update_merge_skips_absent_fields() {
        let update: OrderUpdate = serde_json::from_str(r#"{"notes":"rush order"}"#).unwrap();
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"notes":"rush order"}"#);
    }

    #[test]
    fn create_accepts_item_without_product_reference() {
        let body = r#"{
            "customer": "customer:abc",
            "products": [{"name": "Gift wrap", "quantity": 1, "price": 25.0}],
            "totalAmount": 25.0
        }"#;
        let create: OrderCreate = serde_json::from_str(body).unwrap();
        let items = create.products.unwrap();
        assert!(items[0].product.is_none());
        assert_eq!(items[0].name, "Gift wrap");
    }
}
