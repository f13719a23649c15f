//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate, Order};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "customer";

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All customers
    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self.base.db().select(TABLE).await?;
        Ok(customers)
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let thing = parse_record_id(TABLE, id);
        let customer: Option<Customer> = self.base.db().select(thing).await?;
        Ok(customer)
    }

    /// Find customer by exact phone
    async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Customer>> {
        let phone_owned = phone.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE phone = $phone LIMIT 1")
            .bind(("phone", phone_owned))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Find customer by exact email
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Customer>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create a new customer
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        // Check duplicate phone
        if !data.phone.is_empty() && self.find_by_phone(&data.phone).await?.is_some() {
            return Err(RepoError::Duplicate(
                "Mobile number already exists".to_string(),
            ));
        }

        // Check duplicate email
        if let Some(ref email) = data.email
            && !email.is_empty()
            && self.find_by_email(email).await?.is_some()
        {
            return Err(RepoError::Duplicate(
                "Email address already exists".to_string(),
            ));
        }

        let now = now_iso();
        let customer = Customer {
            id: None,
            name: data.name,
            email: data.email,
            phone: data.phone,
            address: data.address,
            company: data.company,
            status: data.status.unwrap_or_default(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Customer> = self.base.db().create(TABLE).content(customer).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    /// Orders placed by a customer, newest first
    pub async fn orders_for(&self, customer_id: &str) -> RepoResult<Vec<Order>> {
        let customer_ref = parse_record_id(TABLE, customer_id).to_string();
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE customer = $customer ORDER BY orderDate DESC")
            .bind(("customer", customer_ref))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Staged phone search: exact forms first, then digits-in-order ignoring
    /// separators, then a name substring fallback. Always returns a list,
    /// empty on no match.
    pub async fn search_by_phone(&self, term: &str) -> RepoResult<Vec<Customer>> {
        let normalized = term.strip_prefix("+91").unwrap_or(term).trim().to_string();

        // 1. Exact match: raw input, normalized, or +91-prefixed
        let mut customers: Vec<Customer> = self
            .base
            .db()
            .query(
                "SELECT * FROM customer WHERE phone = $raw OR phone = $plain OR phone = $prefixed",
            )
            .bind(("raw", term.to_string()))
            .bind(("plain", normalized.clone()))
            .bind(("prefixed", format!("+91{normalized}")))
            .await?
            .take(0)?;

        // 2. Digits in order, anything in between
        if customers.is_empty() {
            let digits: String = normalized.chars().filter(|c| c.is_ascii_digit()).collect();
            if !digits.is_empty() {
                let pattern = digits
                    .chars()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(".*");
                customers = self
                    .base
                    .db()
                    .query("SELECT * FROM customer WHERE string::matches(phone, $pattern)")
                    .bind(("pattern", pattern))
                    .await?
                    .take(0)?;
            }
        }

        // 3. Name substring fallback
        if customers.is_empty() {
            customers = self
                .base
                .db()
                .query(
                    "SELECT * FROM customer \
                     WHERE string::lowercase(name) CONTAINS string::lowercase($term)",
                )
                .bind(("term", term.to_string()))
                .await?
                .take(0)?;
        }

        Ok(customers)
    }

    /// Update a customer (field merge)
    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let thing = parse_record_id(TABLE, id);
        let existing: Option<Customer> = self.base.db().select(thing.clone()).await?;
        if existing.is_none() {
            return Err(RepoError::NotFound("Customer not found".to_string()));
        }

        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updatedAt = $now")
            .bind(("id", thing.clone()))
            .bind(("now", now_iso()))
            .await?;

        let updated: Option<Customer> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound("Customer not found".to_string()))
    }

    /// Hard delete a customer
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let thing = parse_record_id(TABLE, id);
        let deleted: Option<Customer> = self.base.db().delete(thing).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound("Customer not found".to_string()));
        }
        Ok(())
    }
}
