//! Stock Movement Repository
//!
//! Manual stock adjustments. This is the one write path that recomputes the
//! product's `inStock` flag after changing its quantity.

use std::collections::{HashMap, HashSet};

use super::{BaseRepository, RepoError, RepoResult, now_iso};
use crate::db::models::{
    MovementType, Product, ProductRef, StockMovement, StockMovementCreate, StockMovementDetail,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "stock_movement";

#[derive(Clone)]
pub struct StockMovementRepository {
    base: BaseRepository,
}

impl StockMovementRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All movements with the product name resolved
    pub async fn find_all_detailed(&self) -> RepoResult<Vec<StockMovementDetail>> {
        let movements: Vec<StockMovement> = self.base.db().select(TABLE).await?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for movement in &movements {
            if seen.insert(movement.product.to_string()) {
                ids.push(movement.product.clone());
            }
        }

        let mut products_by_id: HashMap<String, ProductRef> = HashMap::new();
        if !ids.is_empty() {
            let mut result = self
                .base
                .db()
                .query("SELECT id, name FROM product WHERE id IN $ids")
                .bind(("ids", ids))
                .await?;
            let refs: Vec<ProductRef> = result.take(0)?;
            for product_ref in refs {
                if let Some(id) = product_ref.id.clone() {
                    products_by_id.insert(id.to_string(), product_ref);
                }
            }
        }

        Ok(movements
            .into_iter()
            .map(|movement| {
                let product = products_by_id.get(&movement.product.to_string()).cloned();
                StockMovementDetail {
                    id: movement.id,
                    product,
                    movement_type: movement.movement_type,
                    quantity: movement.quantity,
                    reason: movement.reason,
                    reference: movement.reference,
                    date: movement.date,
                    created_at: movement.created_at,
                }
            })
            .collect())
    }

    /// Record a movement, applying it to the product's stock first.
    ///
    /// IN adds to the quantity; OUT checks sufficiency and subtracts. Either
    /// way the product's `inStock` flag is recomputed from the new quantity
    /// before the movement itself is persisted.
    pub async fn create(&self, data: StockMovementCreate) -> RepoResult<StockMovement> {
        let Some(product_id) = data.product else {
            return Err(RepoError::Validation("Product is required".to_string()));
        };

        let product: Option<Product> = self.base.db().select(product_id.clone()).await?;
        let Some(product) = product else {
            return Err(RepoError::NotFound("Product not found".to_string()));
        };

        let quantity = match data.movement_type {
            MovementType::In => product.quantity + data.quantity,
            MovementType::Out => {
                if product.quantity < data.quantity {
                    return Err(RepoError::InsufficientStock(
                        "Insufficient stock".to_string(),
                    ));
                }
                product.quantity - data.quantity
            }
        };

        let now = now_iso();
        let _ = self
            .base
            .db()
            .query("UPDATE $product SET quantity = $quantity, inStock = $in_stock, updatedAt = $now")
            .bind(("product", product_id.clone()))
            .bind(("quantity", quantity))
            .bind(("in_stock", quantity > 0))
            .bind(("now", now.clone()))
            .await?;

        let movement = StockMovement {
            id: None,
            product: product_id,
            movement_type: data.movement_type,
            quantity: data.quantity,
            reason: data.reason,
            reference: data.reference,
            date: Some(now.clone()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<StockMovement> =
            self.base.db().create(TABLE).content(movement).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create stock movement".to_string()))
    }
}
