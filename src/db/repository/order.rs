//! Order Repository
//!
//! Owns the order lifecycle and its stock side effects. This is the only
//! place that changes `Product.quantity` as a result of order activity, and
//! it reproduces the source system's reconciliation rules exactly, including
//! the known gaps: a create that fails mid-loop keeps its earlier
//! deductions, the replacement rollback only re-deducts the old items, and
//! deleting an order never restocks.
//!
//! Stock writes go through an UPDATE on a specific record id, which is a
//! no-op when the product no longer exists, so dangling item references
//! never fail a request. `in_stock` is never touched here.

use std::collections::{HashMap, HashSet};

use super::{BaseRepository, RepoError, RepoResult, now_iso};
use crate::db::models::{
    Customer, CustomerRef, LineItemDetail, Order, OrderCreate, OrderDetail, OrderStatus,
    OrderUpdate, Product, SalesRow,
};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::RecordId;

const TABLE: &str = "order";

const REQUIRED_MSG: &str = "Customer and products are required";

#[derive(Debug, Deserialize)]
struct CountRow {
    total: i64,
}

/// Filters accepted by the order listing
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub search: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: i64,
    pub limit: i64,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Load a product by record id
    async fn fetch_product(&self, product: &RecordId) -> RepoResult<Option<Product>> {
        let product: Option<Product> = self.base.db().select(product.clone()).await?;
        Ok(product)
    }

    /// Apply a stock delta to a product. A no-op when the record does not
    /// exist. Leaves `in_stock` alone.
    async fn adjust_stock(&self, product: &RecordId, delta: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $product SET quantity += $delta")
            .bind(("product", product.clone()))
            .bind(("delta", delta))
            .await?;
        Ok(())
    }

    fn insufficient(product: &Product) -> RepoError {
        RepoError::InsufficientStock(format!("Insufficient stock for product: {}", product.name))
    }

    /// Create an order, deducting stock item by item.
    ///
    /// Items referencing a missing product are skipped but stay on the
    /// order. An insufficient item aborts without undoing the deductions
    /// already applied for earlier items.
    pub async fn create_order(&self, data: OrderCreate) -> RepoResult<Order> {
        let Some(customer) = data.customer else {
            return Err(RepoError::Validation(REQUIRED_MSG.to_string()));
        };
        let Some(products) = data.products.filter(|items| !items.is_empty()) else {
            return Err(RepoError::Validation(REQUIRED_MSG.to_string()));
        };

        for item in &products {
            let Some(product_ref) = &item.product else {
                continue;
            };
            if let Some(product) = self.fetch_product(product_ref).await? {
                if product.quantity < item.quantity {
                    return Err(Self::insufficient(&product));
                }
                self.adjust_stock(product_ref, -item.quantity).await?;
            }
        }

        let now = now_iso();
        let order = Order {
            id: None,
            customer,
            products,
            total_amount: data.total_amount.unwrap_or(0.0),
            status: data.status.unwrap_or_default(),
            payment_status: data.payment_status.unwrap_or_default(),
            notes: data.notes,
            order_date: Some(now.clone()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Update an order, reconciling stock first.
    ///
    /// Exactly one reconciliation branch runs, picked in priority order:
    /// cancellation restores all current items; un-cancellation re-deducts;
    /// a replacement item list restores the old items then deducts the new
    /// ones with a best-effort rollback on failure; anything else leaves
    /// stock alone. The payload is merged into the order afterwards, unless
    /// a branch aborted.
    pub async fn update_order(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let thing = super::parse_record_id(TABLE, id);
        let old: Option<Order> = self.base.db().select(thing.clone()).await?;
        let Some(old) = old else {
            return Err(RepoError::NotFound("Order not found".to_string()));
        };

        if data.status == Some(OrderStatus::Cancelled) && old.status != OrderStatus::Cancelled {
            // Cancelling: every current item goes back to stock, no checks
            for item in &old.products {
                if let Some(product_ref) = &item.product {
                    self.adjust_stock(product_ref, item.quantity).await?;
                }
            }
        } else if old.status == OrderStatus::Cancelled
            && data.status.is_some()
            && data.status != Some(OrderStatus::Cancelled)
        {
            // Un-cancelling: deduct again, from the incoming list when one
            // was sent. Deductions made before a failing item stay applied.
            let items = data.products.clone().unwrap_or_else(|| old.products.clone());
            for item in &items {
                let Some(product_ref) = &item.product else {
                    continue;
                };
                if let Some(product) = self.fetch_product(product_ref).await?
                    && product.quantity < item.quantity
                {
                    return Err(Self::insufficient(&product));
                }
                self.adjust_stock(product_ref, -item.quantity).await?;
            }
        } else if let Some(new_items) = data.products.clone()
            && data.status != Some(OrderStatus::Cancelled)
        {
            // Replacing the item list: restore the old items, then deduct
            // the new list
            for item in &old.products {
                if let Some(product_ref) = &item.product {
                    self.adjust_stock(product_ref, item.quantity).await?;
                }
            }
            for item in &new_items {
                let Some(product_ref) = &item.product else {
                    continue;
                };
                if let Some(product) = self.fetch_product(product_ref).await?
                    && product.quantity < item.quantity
                {
                    // Best-effort rollback: re-deduct the old items only.
                    // Deductions already applied for earlier new items stay.
                    for rollback_item in &old.products {
                        if let Some(rollback_ref) = &rollback_item.product {
                            self.adjust_stock(rollback_ref, -rollback_item.quantity)
                                .await?;
                        }
                    }
                    return Err(Self::insufficient(&product));
                }
                self.adjust_stock(product_ref, -item.quantity).await?;
            }
        }

        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updatedAt = $now")
            .bind(("id", thing.clone()))
            .bind(("now", now_iso()))
            .await?;

        let updated: Option<Order> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound("Order not found".to_string()))
    }

    /// Hard delete an order. Stock is not restored.
    pub async fn delete_order(&self, id: &str) -> RepoResult<()> {
        let thing = super::parse_record_id(TABLE, id);
        let deleted: Option<Order> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Order not found".to_string()));
        }
        Ok(())
    }

    /// Load an order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing = super::parse_record_id(TABLE, id);
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Filtered, paged order listing with customer and product references
    /// resolved. Returns the page plus the total match count.
    pub async fn find_detailed_page(
        &self,
        filter: OrderFilter,
    ) -> RepoResult<(Vec<OrderDetail>, i64)> {
        let mut conditions: Vec<&str> = Vec::new();

        if let Some(status) = &filter.status
            && status != "All"
        {
            conditions.push("status = $status");
        }
        if let Some(payment_status) = &filter.payment_status
            && payment_status != "All"
        {
            conditions.push("paymentStatus = $payment_status");
        }
        if filter.start_date.is_some() {
            conditions.push("createdAt >= $start_date");
        }
        if filter.end_date.is_some() {
            conditions.push("createdAt <= $end_date");
        }

        // Search matches customer names, plus the order id itself when the
        // term parses as one
        let mut customer_refs: Option<Vec<String>> = None;
        let mut order_id: Option<RecordId> = None;
        if let Some(search) = filter.search.as_deref()
            && !search.is_empty()
        {
            let ids: Vec<RecordId> = self
                .base
                .db()
                .query(
                    "SELECT VALUE id FROM customer \
                     WHERE string::lowercase(name) CONTAINS string::lowercase($search)",
                )
                .bind(("search", search.to_string()))
                .await?
                .take(0)?;
            customer_refs = Some(ids.iter().map(|id| id.to_string()).collect());
            order_id = search_record_id(search);
            conditions.push(if order_id.is_some() {
                "(customer IN $customer_refs OR id = $order_id)"
            } else {
                "customer IN $customer_refs"
            });
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = filter.page.max(1);
        let limit = filter.limit.max(1);
        let start = (page - 1) * limit;

        let list_sql = format!(
            "SELECT * FROM {TABLE}{where_clause} ORDER BY createdAt DESC LIMIT $limit START $start"
        );
        let count_sql = format!("SELECT count() AS total FROM {TABLE}{where_clause} GROUP ALL");

        let mut query = self
            .base
            .db()
            .query(list_sql)
            .query(count_sql)
            .bind(("limit", limit))
            .bind(("start", start));
        if let Some(status) = filter.status
            && status != "All"
        {
            query = query.bind(("status", status));
        }
        if let Some(payment_status) = filter.payment_status
            && payment_status != "All"
        {
            query = query.bind(("payment_status", payment_status));
        }
        if let Some(start_date) = filter.start_date {
            query = query.bind(("start_date", start_date));
        }
        if let Some(end_date) = filter.end_date {
            query = query.bind(("end_date", end_date));
        }
        if let Some(refs) = customer_refs {
            query = query.bind(("customer_refs", refs));
        }
        if let Some(order_id) = order_id {
            query = query.bind(("order_id", order_id));
        }

        let mut result = query.await?;
        let orders: Vec<Order> = result.take(0)?;
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);

        let details = self.resolve_details(orders).await?;
        Ok((details, total))
    }

    /// Resolve customer and product links for a page of orders. Dangling
    /// references resolve to `None`.
    async fn resolve_details(&self, orders: Vec<Order>) -> RepoResult<Vec<OrderDetail>> {
        let mut seen_customers = HashSet::new();
        let mut customer_ids: Vec<RecordId> = Vec::new();
        let mut seen_products = HashSet::new();
        let mut product_ids: Vec<RecordId> = Vec::new();
        for order in &orders {
            if seen_customers.insert(order.customer.to_string()) {
                customer_ids.push(order.customer.clone());
            }
            for item in &order.products {
                if let Some(product) = &item.product
                    && seen_products.insert(product.to_string())
                {
                    product_ids.push(product.clone());
                }
            }
        }

        let customers: Vec<Customer> = if customer_ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT * FROM customer WHERE id IN $ids")
                .bind(("ids", customer_ids))
                .await?
                .take(0)?
        };
        let products: Vec<Product> = if product_ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT * FROM product WHERE id IN $ids")
                .bind(("ids", product_ids))
                .await?
                .take(0)?
        };

        let mut customer_map: HashMap<String, Customer> = HashMap::new();
        for customer in customers {
            let Some(key) = customer.id.as_ref().map(|id| id.to_string()) else {
                continue;
            };
            customer_map.insert(key, customer);
        }
        let mut product_map: HashMap<String, Product> = HashMap::new();
        for product in products {
            let Some(key) = product.id.as_ref().map(|id| id.to_string()) else {
                continue;
            };
            product_map.insert(key, product);
        }

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            let customer = customer_map.get(&order.customer.to_string()).cloned();
            let products = order
                .products
                .into_iter()
                .map(|item| LineItemDetail {
                    product: item
                        .product
                        .as_ref()
                        .and_then(|p| product_map.get(&p.to_string()).cloned()),
                    name: item.name,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect();
            details.push(OrderDetail {
                id: order.id,
                customer,
                products,
                total_amount: order.total_amount,
                status: order.status,
                payment_status: order.payment_status,
                notes: order.notes,
                order_date: order.order_date,
                created_at: order.created_at,
                updated_at: order.updated_at,
            });
        }
        Ok(details)
    }

    /// Orders for the sales report, customer resolved to id and name. The
    /// date range applies only when both bounds are present.
    pub async fn sales_rows(
        &self,
        start: Option<String>,
        end: Option<String>,
    ) -> RepoResult<Vec<SalesRow>> {
        let orders: Vec<Order> = if let (Some(start), Some(end)) = (start, end) {
            self.base
                .db()
                .query("SELECT * FROM order WHERE createdAt >= $start AND createdAt <= $end")
                .bind(("start", start))
                .bind(("end", end))
                .await?
                .take(0)?
        } else {
            self.base.db().select(TABLE).await?
        };

        let mut seen = HashSet::new();
        let mut ids: Vec<RecordId> = Vec::new();
        for order in &orders {
            if seen.insert(order.customer.to_string()) {
                ids.push(order.customer.clone());
            }
        }
        let refs: Vec<CustomerRef> = if ids.is_empty() {
            Vec::new()
        } else {
            self.base
                .db()
                .query("SELECT id, name FROM customer WHERE id IN $ids")
                .bind(("ids", ids))
                .await?
                .take(0)?
        };
        let mut by_id: HashMap<String, CustomerRef> = HashMap::new();
        for customer in refs {
            let Some(key) = customer.id.as_ref().map(|id| id.to_string()) else {
                continue;
            };
            by_id.insert(key, customer);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let customer = by_id.get(&order.customer.to_string()).cloned();
                SalesRow {
                    id: order.id,
                    customer,
                    products: order.products,
                    total_amount: order.total_amount,
                    status: order.status,
                    payment_status: order.payment_status,
                    notes: order.notes,
                    order_date: order.order_date,
                    created_at: order.created_at,
                }
            })
            .collect())
    }

    /// Every order total, for revenue aggregation
    pub async fn all_totals(&self) -> RepoResult<Vec<f64>> {
        let totals: Vec<f64> = self
            .base
            .db()
            .query("SELECT VALUE totalAmount FROM order")
            .await?
            .take(0)?;
        Ok(totals)
    }

    /// Count orders whose stored status equals the given literal exactly
    pub async fn count_by_status(&self, status: &str) -> RepoResult<i64> {
        let status_owned = status.to_string();
        let counts: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS total FROM order WHERE status = $status GROUP ALL")
            .bind(("status", status_owned))
            .await?
            .take(0)?;
        Ok(counts.first().map(|c| c.total).unwrap_or(0))
    }
}

/// Treat a search term as a possible order record id. Auto-generated keys
/// are 20 lowercase alphanumerics; the `order:`-prefixed form is accepted
/// too.
fn search_record_id(search: &str) -> Option<RecordId> {
    let key = search.strip_prefix("order:").unwrap_or(search);
    let looks_like_key = key.len() == 20
        && key
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    looks_like_key.then(|| RecordId::from_table_key(TABLE, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_record_id_accepts_key_shapes() {
        let key = "0u5jvmp4qtd62kyf81zc";
        assert!(search_record_id(key).is_some());
        assert!(search_record_id(&format!("order:{key}")).is_some());
    }

    #[test]
    fn search_record_id_rejects_names_and_short_terms() {
        assert!(search_record_id("John Doe").is_none());
        assert!(search_record_id("abc123").is_none());
        // Uppercase is never part of a generated key
        assert!(search_record_id("0U5JVMP4QTD62KYF81ZC").is_none());
    }
}
