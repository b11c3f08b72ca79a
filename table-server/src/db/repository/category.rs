//! Category Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
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

    /// Find all active categories ordered for display
    pub async fn find_all(&self) -> RepoResult<Vec<Category>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category WHERE is_active = true ORDER BY sort_order, name")
            .await?
            .take(0)?;
        Ok(categories)
    }

    /// Find category by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Category>> {
        let thing = self.base.parse_id(id)?;
        let category: Option<Category> = self.base.db().select(thing).await?;
        Ok(category)
    }

    /// Find category by name, case-insensitive
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Category>> {
        let key = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM category WHERE name_key = $key LIMIT 1")
            .bind(("key", key))
            .await?;
        let categories: Vec<Category> = result.take(0)?;
        Ok(categories.into_iter().next())
    }

    /// Create a new category
    pub async fn create(&self, data: CategoryCreate) -> RepoResult<Category> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                data.name
            )));
        }

        let mut category = Category::new(data.name);
        category.sort_order = data.sort_order.unwrap_or(0);

        let created: Option<Category> = self.base.db().create(TABLE).content(category).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create category".to_string()))
    }

    /// Update a category
    pub async fn update(&self, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))?;

        if let Some(new_name) = &data.name
            && let Some(found) = self.find_by_name(new_name).await?
            && found.id != existing.id
        {
            return Err(RepoError::Duplicate(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let name = data.name.unwrap_or(existing.name);
        let name_key = name.trim().to_lowercase();
        let sort_order = data.sort_order.unwrap_or(existing.sort_order);
        let is_active = data.is_active.unwrap_or(existing.is_active);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, name_key = $name_key, sort_order = $sort_order, is_active = $is_active")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("name_key", name_key))
            .bind(("sort_order", sort_order))
            .bind(("is_active", is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Category {} not found", id)))
    }

    /// Count menu items still linked to this category
    pub async fn count_items(&self, id: &str) -> RepoResult<usize> {
        #[derive(serde::Deserialize)]
        struct CountRow {
            count: usize,
        }
        let cat = self.base.link_ref(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM menu_item WHERE category = $cat AND is_active = true GROUP ALL")
            .bind(("cat", cat))
            .await?;
        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.into_iter().next().map(|row| row.count).unwrap_or(0))
    }

    /// Hard delete a category
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
