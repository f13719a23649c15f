//! Shop Settings Model
//!
//! Single-record table. The repository materializes the record with defaults
//! on first read and merges partial updates into it afterwards.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Shop-wide settings singleton
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default = "default_shop_name")]
    pub shop_name: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub logo_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_shop_name() -> String {
    "Sayan Digital".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: None,
            shop_name: default_shop_name(),
            tax_id: String::new(),
            address: String::new(),
            email: String::new(),
            phone: String::new(),
            currency: default_currency(),
            timezone: default_timezone(),
            logo_url: String::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub shop_name: Option<String>,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
    pub logo_url: Option<String>,
}
