//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{InventoryRow, Product, ProductCreate, ProductUpdate};
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "product";

/// Fields the list endpoint accepts in its `sort` parameter. Anything else
/// falls back to newest-first.
const SORT_FIELDS: &[&str] = &[
    "name",
    "category",
    "quantity",
    "buyingPrice",
    "sellingPrice",
    "inStock",
    "createdAt",
    "updatedAt",
];

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

/// Merge payload for updates. Text fields only when supplied; numeric fields
/// always written, defaulting to 0 when absent, with `inStock` recomputed
/// from the submitted values (source behavior, kept).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProductMerge {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    buying_price: f64,
    selling_price: f64,
    quantity: i64,
    in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    updated_at: String,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Paged product listing with optional name search, category filter and
    /// sort. Returns the page plus the total match count.
    pub async fn find_page(
        &self,
        search: Option<&str>,
        category: Option<&str>,
        sort: Option<&str>,
        page: i64,
        limit: i64,
    ) -> RepoResult<(Vec<Product>, i64)> {
        let mut conditions: Vec<&str> = Vec::new();
        if search.is_some() {
            conditions.push("string::lowercase(name) CONTAINS string::lowercase($search)");
        }
        if category.is_some() {
            conditions.push("category = $category");
        }
        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = page.max(1);
        let limit = limit.max(1);
        let start = (page - 1) * limit;

        let list_sql = format!(
            "SELECT * FROM {TABLE}{where_clause} ORDER BY {} LIMIT $limit START $start",
            sort_clause(sort)
        );
        let count_sql = format!("SELECT count() AS total FROM {TABLE}{where_clause} GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(list_sql)
            .query(count_sql)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(search) = search {
            query = query.bind(("search", search.to_string()));
        }
        if let Some(category) = category {
            query = query.bind(("category", category.to_string()));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);
        Ok((products, total))
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing = parse_record_id(TABLE, id);
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let quantity = data.quantity.unwrap_or(0);
        let now = now_iso();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            category: data.category.unwrap_or_default(),
            buying_price: data.buying_price.unwrap_or(0.0),
            selling_price: data.selling_price.unwrap_or(0.0),
            quantity,
            in_stock: data.in_stock == Some(true) || quantity > 0,
            image_url: data.image_url.unwrap_or_default(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Product> = self.base.db().create(TABLE).content(product).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing = parse_record_id(TABLE, id);
        let existing: Option<Product> = self.base.db().select(thing.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound("Product not found".to_string()));
        }

        let quantity = data.quantity.unwrap_or(0);
        let merge = ProductMerge {
            name: data.name,
            description: data.description,
            category: data.category,
            buying_price: data.buying_price.unwrap_or(0.0),
            selling_price: data.selling_price.unwrap_or(0.0),
            quantity,
            in_stock: data.in_stock == Some(true) || quantity > 0,
            image_url: data.image_url,
            updated_at: now_iso(),
        };

        let updated: Option<Product> = self.base.db().update(thing).merge(merge).await?;
        updated.ok_or_else(|| RepoError::NotFound("Product not found".to_string()))
    }

    /// Hard delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id);
        let deleted: Option<Product> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Product not found".to_string()));
        }
        Ok(())
    }

    /// Projection for the inventory report
    pub async fn inventory_rows(&self) -> RepoResult<Vec<InventoryRow>> {
        let rows: Vec<InventoryRow> = self
            .base
            .db()
            .query(
                "SELECT name, category, quantity, buyingPrice, sellingPrice, inStock FROM product",
            )
            .await?
            .take(0)?;
        Ok(rows)
    }

    /// Total number of products
    pub async fn count_all(&self) -> RepoResult<i64> {
        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM product GROUP ALL")
            .await?
            .take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }

    /// Number of products at or below the low-stock threshold
    pub async fn count_low_stock(&self, threshold: i64) -> RepoResult<i64> {
        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM product WHERE quantity <= $threshold GROUP ALL")
            .bind(("threshold", threshold))
            .await?
            .take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }
}

fn sort_clause(sort: Option<&str>) -> String {
    if let Some(sort) = sort {
        let (field, order) = match sort.split_once(':') {
            Some((field, order)) => (field, order),
            None => (sort, ""),
        };
        if SORT_FIELDS.contains(&field) {
            let direction = if order == "desc" { "DESC" } else { "ASC" };
            return format!("{field} {direction}");
        }
    }
    "createdAt DESC".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_clause_parses_field_and_direction() {
        assert_eq!(sort_clause(Some("name:desc")), "name DESC");
        assert_eq!(sort_clause(Some("name:asc")), "name ASC");
        // Anything other than desc sorts ascending
        assert_eq!(sort_clause(Some("quantity:up")), "quantity ASC");
        assert_eq!(sort_clause(Some("sellingPrice")), "sellingPrice ASC");
    }

    #[test]
    fn sort_clause_rejects_unknown_fields() {
        assert_eq!(sort_clause(Some("password:desc")), "createdAt DESC");
        assert_eq!(sort_clause(Some("name; DELETE product")), "createdAt DESC");
        assert_eq!(sort_clause(None), "createdAt DESC");
    }
}
