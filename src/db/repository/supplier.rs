//! Supplier Repository

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{Supplier, SupplierCreate, SupplierUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "supplier";

#[derive(Clone)]
pub struct SupplierRepository {
    base: BaseRepository,
}

impl SupplierRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    pub async fn find_all(&self) -> RepoResult<Vec<Supplier>> {
        let suppliers: Vec<Supplier> = self.base.db().select(TABLE).await?;
        Ok(suppliers)
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Supplier>> {
        let thing = parse_record_id(TABLE, id);
        let supplier: Option<Supplier> = self.base.db().select(thing).await?;
        Ok(supplier)
    }

    pub async fn create(&self, data: SupplierCreate) -> RepoResult<Supplier> {
        let now = now_iso();
        let supplier = Supplier {
            id: None,
            name: data.name,
            contact_person: data.contact_person,
            email: data.email,
            phone: data.phone,
            address: data.address,
            is_active: data.is_active.unwrap_or(true),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Supplier> = self.base.db().create(TABLE).content(supplier).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create supplier".to_string()))
    }

    pub async fn update(&self, id: &str, data: SupplierUpdate) -> RepoResult<Supplier> {
        let thing = parse_record_id(TABLE, id);
        let existing: Option<Supplier> = self.base.db().select(thing.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound("Supplier not found".to_string()));
        }

        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updatedAt = $now")
            .bind(("id", thing.clone()))
            .bind(("now", now_iso()))
            .await?;

        let updated: Option<Supplier> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound("Supplier not found".to_string()))
    }

    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id);
        let deleted: Option<Supplier> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Supplier not found".to_string()));
        }
        Ok(())
    }
}
