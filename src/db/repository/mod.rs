//! Repository Module
//!
//! CRUD and query operations over the SurrealDB tables. Handlers construct
//! a repository per request from the shared database handle.
//!
//! ID convention: clients see record ids in `table:key` form. Helpers below
//! accept either the full form or the bare key.

// Catalog
pub mod category;
pub mod product;
pub mod supplier;

// Sales
pub mod customer;
pub mod invoice;
pub mod order;

// Inventory
pub mod stock_movement;

// System
pub mod settings;
pub mod user;

// Re-exports
pub use category::CategoryRepository;
pub use customer::CustomerRepository;
pub use invoice::InvoiceRepository;
pub use order::{OrderFilter, OrderRepository};
pub use product::ProductRepository;
pub use settings::SettingsRepository;
pub use stock_movement::StockMovementRepository;
pub use supplier::SupplierRepository;
pub use user::UserRepository;

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("{0}")]
    InsufficientStock(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Build a [`RecordId`] from a client-supplied id that may or may not carry
/// the `table:` prefix. Never fails; an id that matches no record simply
/// selects nothing.
pub fn parse_record_id(table: &str, id: &str) -> RecordId {
    match id.split_once(':') {
        Some((tb, key)) if tb == table => RecordId::from_table_key(table, key),
        _ => RecordId::from_table_key(table, id),
    }
}

/// Current UTC time as a fixed-width RFC3339 string (millisecond precision,
/// `Z` suffix). String comparison on these values matches chronological
/// order, which the date-range filters rely on.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Normalize a date query parameter to the stored timestamp format.
///
/// Accepts a full RFC3339 timestamp or a bare `YYYY-MM-DD` (interpreted as
/// midnight UTC). Returns `None` for unparseable input, which drops the
/// filter rather than failing the request.
pub fn parse_date_param(value: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| {
            Utc.from_utc_datetime(&naive)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_id_accepts_both_forms() {
        let full = parse_record_id("order", "order:abc123");
        let bare = parse_record_id("order", "abc123");
        assert_eq!(full, bare);
        assert_eq!(full.table(), "order");
    }

    #[test]
    fn parse_record_id_keeps_foreign_prefix_as_key() {
        let id = parse_record_id("order", "customer:abc");
        assert_eq!(id.table(), "order");
        assert_ne!(id, parse_record_id("order", "abc"));
    }

    #[test]
    fn now_iso_is_fixed_width_utc() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }

    #[test]
    fn parse_date_param_handles_both_formats() {
        assert_eq!(
            parse_date_param("2024-03-15").as_deref(),
            Some("2024-03-15T00:00:00.000Z")
        );
        assert_eq!(
            parse_date_param("2024-03-15T10:30:00.500Z").as_deref(),
            Some("2024-03-15T10:30:00.500Z")
        );
        assert_eq!(parse_date_param("not-a-date"), None);
    }
}
