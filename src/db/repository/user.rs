//! User Repository

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{ProfileUpdate, User};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(TABLE, id);
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Create a user with a hashed password
    pub async fn create(&self, email: &str, password: &str, name: &str) -> RepoResult<User> {
        if self.find_by_email(email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                email
            )));
        }

        let password = User::hash_password(password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let now = now_iso();
        let user = User {
            id: None,
            email: email.to_string(),
            password,
            name: name.to_string(),
            is_admin: true,
            phone: None,
            address: None,
            avatar: None,
            role: "Admin".to_string(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Seed the admin account on startup when it does not exist yet
    pub async fn ensure_admin(&self, email: &str, password: &str) -> RepoResult<()> {
        if self.find_by_email(email).await?.is_some() {
            return Ok(());
        }
        self.create(email, password, "Admin").await?;
        Ok(())
    }

    /// Profile merge: submitted non-empty fields win, the rest keep their
    /// stored values. A submitted password is re-hashed.
    pub async fn update_profile(&self, id: &str, data: ProfileUpdate) -> RepoResult<User> {
        let mut user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("User not found".to_string()))?;

        if let Some(name) = data.name
            && !name.is_empty()
        {
            user.name = name;
        }
        if let Some(email) = data.email
            && !email.is_empty()
        {
            user.email = email;
        }
        if let Some(phone) = data.phone
            && !phone.is_empty()
        {
            user.phone = Some(phone);
        }
        if let Some(address) = data.address
            && !address.is_empty()
        {
            user.address = Some(address);
        }
        if let Some(avatar) = data.avatar
            && !avatar.is_empty()
        {
            user.avatar = Some(avatar);
        }
        if let Some(role) = data.role
            && !role.is_empty()
        {
            user.role = role;
        }
        if let Some(password) = data.password
            && !password.is_empty()
        {
            user.password = User::hash_password(&password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        }

        user.updated_at = Some(now_iso());
        user.id = None;

        let thing = parse_record_id(TABLE, id);
        let updated: Option<User> = self.base.db().update(thing).content(user).await?;
        updated.ok_or_else(|| RepoError::NotFound("User not found".to_string()))
    }
}
