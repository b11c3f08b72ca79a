//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{DiningTable, DiningTableCreate, DiningTableUpdate};
use crate::db::repository::DiningTableRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.get_db());
    let tables = repo.find_all().await?;
    Ok(Json(tables))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::TableNotFound, format!("Table {} not found", id))
    })?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.create(payload).await?;
    Ok(Json(table))
}

/// PUT /api/tables/:id - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let repo = DiningTableRepository::new(state.get_db());
    let table = repo.update(&id, payload).await?;
    Ok(Json(table))
}

/// DELETE /api/tables/:id - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = DiningTableRepository::new(state.get_db());
    let result = repo.delete(&id).await?;
    Ok(Json(result))
}
