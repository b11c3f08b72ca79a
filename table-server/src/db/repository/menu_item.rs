//! Menu Item Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "menu_item";

#[derive(Clone)]
pub struct MenuItemRepository {
    base: BaseRepository,
}

impl MenuItemRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active menu items ordered for display
    pub async fn find_all(&self) -> RepoResult<Vec<MenuItem>> {
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE is_active = true ORDER BY sort_order, name")
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find all active items in a category
    pub async fn find_by_category(&self, category_id: &str) -> RepoResult<Vec<MenuItem>> {
        let cat = self.base.link_ref(category_id)?;
        let items: Vec<MenuItem> = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE category = $cat AND is_active = true ORDER BY sort_order, name")
            .bind(("cat", cat))
            .await?
            .take(0)?;
        Ok(items)
    }

    /// Find item by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<MenuItem>> {
        let thing = self.base.parse_id(id)?;
        let item: Option<MenuItem> = self.base.db().select(thing).await?;
        Ok(item)
    }

    /// Find item by name within a category, case-insensitive
    ///
    /// Duplicate identity is (name, category), so the same dish name may
    /// exist under different categories.
    pub async fn find_by_name_in_category(
        &self,
        name: &str,
        category: &RecordId,
    ) -> RepoResult<Option<MenuItem>> {
        let key = name.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM menu_item WHERE name_key = $key AND category = $cat LIMIT 1")
            .bind(("key", key))
            .bind(("cat", category.to_string()))
            .await?;
        let items: Vec<MenuItem> = result.take(0)?;
        Ok(items.into_iter().next())
    }

    /// Create a new menu item
    pub async fn create(&self, data: MenuItemCreate) -> RepoResult<MenuItem> {
        if self
            .find_by_name_in_category(&data.name, &data.category)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Menu item '{}' already exists in this category",
                data.name
            )));
        }

        let name_key = data.name.trim().to_lowercase();
        let item = MenuItem {
            id: None,
            name: data.name,
            name_key,
            description: data.description.unwrap_or_default(),
            price: data.price,
            category: data.category,
            image_url: data.image_url,
            allergens: data.allergens,
            dietary_tags: data.dietary_tags,
            customization_groups: data.customization_groups,
            sort_order: data.sort_order.unwrap_or(0),
            is_available: data.is_available.unwrap_or(true),
            is_active: true,
        };

        let created: Option<MenuItem> = self.base.db().create(TABLE).content(item).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create menu item".to_string()))
    }

    /// Update a menu item
    pub async fn update(&self, id: &str, data: MenuItemUpdate) -> RepoResult<MenuItem> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))?;

        // Re-check duplicate identity if name or category changes
        if data.name.is_some() || data.category.is_some() {
            let check_name = data.name.as_ref().unwrap_or(&existing.name);
            let check_cat = data.category.as_ref().unwrap_or(&existing.category);
            if let Some(found) = self.find_by_name_in_category(check_name, check_cat).await?
                && found.id != existing.id
            {
                return Err(RepoError::Duplicate(format!(
                    "Menu item '{}' already exists in this category",
                    check_name
                )));
            }
        }

        let name = data.name.unwrap_or(existing.name);
        let name_key = name.trim().to_lowercase();
        let merged = MenuItem {
            id: existing.id,
            name,
            name_key,
            description: data.description.unwrap_or(existing.description),
            price: data.price.unwrap_or(existing.price),
            category: data.category.unwrap_or(existing.category),
            image_url: data.image_url.or(existing.image_url),
            allergens: data.allergens.unwrap_or(existing.allergens),
            dietary_tags: data.dietary_tags.unwrap_or(existing.dietary_tags),
            customization_groups: data
                .customization_groups
                .unwrap_or(existing.customization_groups),
            sort_order: data.sort_order.unwrap_or(existing.sort_order),
            is_available: data.is_available.unwrap_or(existing.is_available),
            is_active: data.is_active.unwrap_or(existing.is_active),
        };

        // 手动 UPDATE 做整体覆盖；category 以字符串形式落库，绑定同样的形式
        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, name_key = $name_key, description = $description, \
                 price = $price, category = $category, image_url = $image_url, \
                 allergens = $allergens, dietary_tags = $dietary_tags, \
                 customization_groups = $groups, \
                 sort_order = $sort_order, is_available = $is_available, is_active = $is_active",
            )
            .bind(("thing", thing))
            .bind(("name", merged.name.clone()))
            .bind(("name_key", merged.name_key.clone()))
            .bind(("description", merged.description.clone()))
            .bind(("price", merged.price))
            .bind(("category", merged.category.to_string()))
            .bind(("image_url", merged.image_url.clone()))
            .bind(("allergens", merged.allergens.clone()))
            .bind(("dietary_tags", merged.dietary_tags.clone()))
            .bind(("groups", merged.customization_groups.clone()))
            .bind(("sort_order", merged.sort_order))
            .bind(("is_available", merged.is_available))
            .bind(("is_active", merged.is_active))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Toggle availability without touching the rest of the record
    pub async fn set_availability(&self, id: &str, is_available: bool) -> RepoResult<MenuItem> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET is_available = $is_available")
            .bind(("thing", thing))
            .bind(("is_available", is_available))
            .await?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Menu item {} not found", id)))
    }

    /// Hard delete a menu item
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
