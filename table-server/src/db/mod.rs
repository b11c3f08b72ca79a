//! Database Module
//!
//! Embedded SurrealDB storage (RocksDB engine on disk, Mem engine in tests)

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "tabletap";
const DATABASE: &str = "tabletap";

/// Database service — owns an embedded SurrealDB instance
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at the given path
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::prepare(db).await
    }

    /// Create an in-memory database (tests and ephemeral runs)
    pub async fn new_mem() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open in-memory database: {e}")))?;
        Self::prepare(db).await
    }

    async fn prepare(db: Surreal<Db>) -> Result<Self, AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB embedded)");
        Ok(Self { db })
    }
}

/// Define indexes used by lookups and duplicate checks
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "
        DEFINE INDEX IF NOT EXISTS menu_item_name_key ON menu_item FIELDS name_key, category;
        DEFINE INDEX IF NOT EXISTS category_name_key ON category FIELDS name_key;
        DEFINE INDEX IF NOT EXISTS dining_table_name ON dining_table FIELDS name;
        DEFINE INDEX IF NOT EXISTS order_table ON order FIELDS dining_table;
        DEFINE INDEX IF NOT EXISTS order_status ON order FIELDS status;
        DEFINE INDEX IF NOT EXISTS service_request_status ON service_request FIELDS status;
        ",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;
    Ok(())
}
