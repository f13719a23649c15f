//! Invoice Model

use super::order::Order;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Invoice status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Paid,
    #[default]
    Unpaid,
    Overdue,
}

/// Invoice entity, links back to the order it bills
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(with = "serde_helpers::record_id")]
    pub order: RecordId,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for creating an invoice
///
/// Only these three fields are honored; status and issued date always start
/// from their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCreate {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub order: Option<RecordId>,
    pub amount: Option<f64>,
    pub due_date: Option<String>,
}

/// Payload for updating an invoice (field merge)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
}

/// Invoice with the linked order resolved for list responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetail {
    #[serde(with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub order: Option<Order>,
    pub amount: f64,
    pub status: InvoiceStatus,
    pub due_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl InvoiceDetail {
    pub fn from_invoice(invoice: Invoice, order: Option<Order>) -> Self {
        Self {
            id: invoice.id,
            order,
            amount: invoice.amount,
            status: invoice.status,
            due_date: invoice.due_date,
            issued_date: invoice.issued_date,
            created_at: invoice.created_at,
            updated_at: invoice.updated_at,
        }
    }
}
