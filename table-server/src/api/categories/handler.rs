//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    let categories = repo.find_all().await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {} not found", id))
    })?;
    Ok(Json(category))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;
    Ok(Json(category))
}

/// PUT /api/categories/:id - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;
    Ok(Json(category))
}

/// DELETE /api/categories/:id - 删除分类
///
/// 分类下还有菜品时拒绝删除
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    let item_count = repo.count_items(&id).await?;
    if item_count > 0 {
        return Err(AppError::conflict(
            ErrorCode::CategoryHasItems,
            format!("Category still has {item_count} menu items"),
        ));
    }
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
