//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

// Menu Catalog
pub mod category;
pub mod menu_item;

// Location
pub mod dining_table;

// Orders
pub mod order;

// Service Requests
pub mod service_request;

// System
pub mod store_info;

// Re-exports
pub use category::CategoryRepository;
pub use dining_table::DiningTableRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use service_request::ServiceRequestRepository;
pub use store_info::StoreInfoRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

// Repo messages are already fully phrased, so map straight onto codes
impl From<RepoError> for shared::AppError {
    fn from(err: RepoError) -> Self {
        use shared::ErrorCode;
        match err {
            RepoError::NotFound(msg) => shared::AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => {
                shared::AppError::with_message(ErrorCode::AlreadyExists, msg)
            }
            RepoError::Validation(msg) => shared::AppError::validation(msg),
            RepoError::Database(msg) => shared::AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "menu_item:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("menu_item", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId
//
// 关联字段 (menu_item.category, order.dining_table 等) 经 record_id serde
// 以 "table:id" 字符串落库，所以 WHERE 比较也必须绑定同样的字符串形式
// (用 link_ref)，不能绑定原生 RecordId。

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Parse a "table:id" string into a RecordId
    pub fn parse_id(&self, id: &str) -> RepoResult<surrealdb::RecordId> {
        id.parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))
    }

    /// Canonical "table:id" string for comparing against a stored link field
    pub fn link_ref(&self, id: &str) -> RepoResult<String> {
        Ok(self.parse_id(id)?.to_string())
    }
}
