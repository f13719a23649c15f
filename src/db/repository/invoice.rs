//! Invoice Repository

use std::collections::{HashMap, HashSet};

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{Invoice, InvoiceCreate, InvoiceDetail, InvoiceStatus, InvoiceUpdate, Order};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All invoices with their orders resolved in one batch query
    pub async fn find_all_detailed(&self) -> RepoResult<Vec<InvoiceDetail>> {
        let invoices: Vec<Invoice> = self.base.db().select(TABLE).await?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for invoice in &invoices {
            if seen.insert(invoice.order.to_string()) {
                ids.push(invoice.order.clone());
            }
        }

        let mut orders_by_id: HashMap<String, Order> = HashMap::new();
        if !ids.is_empty() {
            let mut result = self
                .base
                .db()
                .query("SELECT * FROM order WHERE id IN $ids")
                .bind(("ids", ids))
                .await?;
            let orders: Vec<Order> = result.take(0)?;
            for order in orders {
                if let Some(id) = order.id.clone() {
                    orders_by_id.insert(id.to_string(), order);
                }
            }
        }

        Ok(invoices
            .into_iter()
            .map(|invoice| {
                // Dangling order references resolve to None
                let order = orders_by_id.get(&invoice.order.to_string()).cloned();
                InvoiceDetail::from_invoice(invoice, order)
            })
            .collect())
    }

    pub async fn create(&self, data: InvoiceCreate) -> RepoResult<Invoice> {
        let Some(order) = data.order else {
            return Err(RepoError::Validation(
                "Order and due date are required".to_string(),
            ));
        };
        let Some(due_date) = data.due_date else {
            return Err(RepoError::Validation(
                "Order and due date are required".to_string(),
            ));
        };

        let now = now_iso();
        let invoice = Invoice {
            id: None,
            order,
            amount: data.amount.unwrap_or(0.0),
            status: InvoiceStatus::default(),
            due_date,
            issued_date: Some(now.clone()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Invoice> = self.base.db().create(TABLE).content(invoice).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }

    pub async fn update(&self, id: &str, data: InvoiceUpdate) -> RepoResult<Invoice> {
        let thing = parse_record_id(TABLE, id);
        let existing: Option<Invoice> = self.base.db().select(thing.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound("Invoice not found".to_string()));
        }

        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updatedAt = $now")
            .bind(("id", thing.clone()))
            .bind(("now", now_iso()))
            .await?;

        let updated: Option<Invoice> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound("Invoice not found".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id);
        let deleted: Option<Invoice> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Invoice not found".to_string()));
        }
        Ok(())
    }
}
