//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Category, MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::{CategoryRepository, MenuItemRepository};
use crate::import::{self, BatchValidation, ImportOptions, ImportReport, RawItemRecord};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// One section of the guest-facing menu
#[derive(Debug, Serialize)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

/// GET /api/menu - 顾客菜单, 按分类分组 (只含上架菜品)
pub async fn board(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuSection>>> {
    let categories = CategoryRepository::new(state.get_db());
    let items = MenuItemRepository::new(state.get_db());

    let mut sections = Vec::new();
    for category in categories.find_all().await? {
        let Some(id) = &category.id else { continue };
        let available: Vec<MenuItem> = items
            .find_by_category(&id.to_string())
            .await?
            .into_iter()
            .filter(|item| item.is_available)
            .collect();
        if !available.is_empty() {
            sections.push(MenuSection { category, items: available });
        }
    }
    Ok(Json(sections))
}

/// Query params for listing menu items
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Filter by category record id ("category:xyz")
    pub category: Option<String>,
}

/// GET /api/menu/items - 获取菜品 (可按分类过滤)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    let items = match query.category {
        Some(cat) => repo.find_by_category(&cat).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(items))
}

/// GET /api/menu/items/:id - 获取单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
    })?;
    Ok(Json(item))
}

/// POST /api/menu/items - 创建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price, "price")?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.create(payload).await?;
    Ok(Json(item))
}

/// PUT /api/menu/items/:id - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.update(&id, payload).await?;
    Ok(Json(item))
}

/// Availability toggle payload
#[derive(Debug, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_available: bool,
}

/// PATCH /api/menu/items/:id/availability - 上架/下架
pub async fn set_availability(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AvailabilityUpdate>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.set_availability(&id, payload.is_available).await?;
    Ok(Json(item))
}

/// DELETE /api/menu/items/:id - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}

/// Import request body
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub records: Vec<RawItemRecord>,
    #[serde(default)]
    pub options: ImportOptions,
}

/// POST /api/menu/import - 批量导入菜品
pub async fn import(
    State(state): State<ServerState>,
    Json(payload): Json<ImportRequest>,
) -> AppResult<Json<ImportReport>> {
    let report = import::import_batch(&state, payload.records, payload.options).await?;
    Ok(Json(report))
}

/// POST /api/menu/import/validate - 导入预检 (不写库)
pub async fn validate_import(
    Json(payload): Json<ImportRequest>,
) -> AppResult<Json<BatchValidation>> {
    Ok(Json(import::validate_batch(&payload.records)))
}
