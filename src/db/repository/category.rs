//! Category Repository

use super::{BaseRepository, RepoError, RepoResult, now_iso, parse_record_id};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate, slugify};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "category";

#[derive(Clone)]
pub struct CategoryRepository {
    base: BaseRepository,
}

impl CategoryRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All categories sorted by name; inactive ones only when asked for
    pub async fn find_all(&self, include_inactive: bool) -> RepoResult<Vec<Category>> {
        let sql = if include_inactive {
            "SELECT * FROM category ORDER BY name"
        } else {
            "SELECT * FROM category WHERE isActive = true ORDER BY name"
        };
        let categories: Vec<Category> = self.base.db().query(sql).await?.take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = parse_record_id(TABLE, id);
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    /// Case-insensitive exact name lookup
    async fn find_by_name_ci(&self, name: &str) -> RepoResult<Option<Category>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM category \
                 WHERE string::lowercase(name) = string::lowercase($name) LIMIT 1",
            )
            .bind(("name", name_owned))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category with a generated slug
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        let name = data.name.trim().to_string();

        if self.find_by_name_ci(&name).await?.is_some() {
            return Err(RepoError::Duplicate(
                "A category with this name already exists".to_string(),
            ));
        }

        let slug = slugify(&name);
        let now = now_iso();
        let category = Category {
            id: None,
            name,
            description: data.description.map(|d| d.trim().to_string()),
            slug,
            is_active: true,
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category. The slug keeps its creation-time value even when
    /// the name changes.
    pub async fn update(&self, id: &str, mut data: CategoryUpdate) -> RepoResult<Category> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound("Category not found".to_string()))?;

        data.name = data.name.map(|n| n.trim().to_string());
        data.description = data.description.map(|d| d.trim().to_string());

        // Check duplicate name if changing, excluding this record
        if let Some(ref new_name) = data.name
            && let Some(conflict) = self.find_by_name_ci(new_name).await?
            && conflict.id != existing.id
        {
            return Err(RepoError::Duplicate(
                "A category with this name already exists".to_string(),
            ));
        }

        let thing = parse_record_id(TABLE, id);
        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updatedAt = $now")
            .bind(("id", thing.clone()))
            .bind(("now", now_iso()))
            .await?;

        let updated: Option<Category> = self.base.db().update(thing).merge(data).await?;
        updated.ok_or_else(|| RepoError::NotFound("Category not found".to_string()))
    }

    /// Soft delete: mark inactive and return the updated document
    pub async fn delete(&self, id: &str) -> RepoResult<Category> {
        let thing = parse_record_id(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET isActive = false, updatedAt = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("now", now_iso()))
            .await?;
        let updated: Option<Category> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound("Category not found".to_string()))
    }
}
