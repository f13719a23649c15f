//! Stock Movement Model
//!
//! Manual inventory adjustments outside the order flow (deliveries, damage,
//! corrections). Unlike the order engine, movements keep `in_stock` in sync
//! with the resulting quantity.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

/// Stock movement entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for recording a movement. The movement date is always set
/// server-side.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementCreate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub product: Option<RecordId>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: String,
    pub reference: Option<String>,
}

/// Movement with the product name resolved for list responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementDetail {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub product: Option<ProductRef>,
    #[serde(rename = "type")]
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Minimal product projection carried on movement listings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_type_uses_uppercase_wire_form() {
        assert_eq!(serde_json::to_string(&MovementType::In).unwrap(), "\"IN\"");
        let parsed: MovementType = serde_json::from_str("\"OUT\"").unwrap();
        assert_eq!(parsed, MovementType::Out);
    }

    #[test]
    fn create_payload_renames_type_field() {
        let body = r#"{"product":"product:abc","type":"IN","quantity":5,"reason":"Delivery"}"#;
        let create: StockMovementCreate = serde_json::from_str(body).unwrap();
        assert_eq!(create.movement_type, MovementType::In);
        assert_eq!(create.quantity, 5);
    }
}
