//! Store Info Repository (Singleton)

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{StoreInfo, StoreInfoUpdate};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store_info";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct StoreInfoRepository {
    base: BaseRepository,
}

impl StoreInfoRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Fetch the singleton record
    pub async fn get(&self) -> RepoResult<Option<StoreInfo>> {
        let info: Option<StoreInfo> = self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(info)
    }

    /// Create the singleton if it does not exist yet
    pub async fn seed_if_missing(&self, defaults: StoreInfo) -> RepoResult<StoreInfo> {
        if let Some(existing) = self.get().await? {
            return Ok(existing);
        }
        let created: Option<StoreInfo> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(defaults)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to seed store info".to_string()))
    }

    /// Merge updates into the singleton
    pub async fn update(&self, data: StoreInfoUpdate) -> RepoResult<StoreInfo> {
        let existing = self
            .get()
            .await?
            .ok_or_else(|| RepoError::NotFound("Store info not initialized".to_string()))?;

        let merged = StoreInfo {
            id: existing.id,
            name: data.name.unwrap_or(existing.name),
            address: data.address.unwrap_or(existing.address),
            phone: data.phone.or(existing.phone),
            tax_rate: data.tax_rate.unwrap_or(existing.tax_rate),
            auto_confirm_on_payment: data
                .auto_confirm_on_payment
                .unwrap_or(existing.auto_confirm_on_payment),
            updated_at: Some(Utc::now().to_rfc3339()),
        };

        self.base
            .db()
            .query(
                "UPDATE $thing SET name = $name, address = $address, phone = $phone, \
                 tax_rate = $tax_rate, auto_confirm_on_payment = $auto_confirm, updated_at = $updated_at",
            )
            .bind(("thing", surrealdb::RecordId::from_table_key(TABLE, SINGLETON_ID)))
            .bind(("name", merged.name.clone()))
            .bind(("address", merged.address.clone()))
            .bind(("phone", merged.phone.clone()))
            .bind(("tax_rate", merged.tax_rate))
            .bind(("auto_confirm", merged.auto_confirm_on_payment))
            .bind(("updated_at", merged.updated_at.clone()))
            .await?;

        self.get()
            .await?
            .ok_or_else(|| RepoError::NotFound("Store info not initialized".to_string()))
    }
}
