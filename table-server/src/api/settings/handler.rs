//! Store Settings API Handlers

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::db::models::{StoreInfo, StoreInfoUpdate};
use crate::db::repository::StoreInfoRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, validate_optional_text, validate_tax_rate,
};
use crate::utils::{AppError, AppResult, ErrorCode};

/// GET /api/settings - 店铺设置
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<StoreInfo>> {
    let repo = StoreInfoRepository::new(state.get_db());
    let info = repo.get().await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::ConfigError, "Store info not initialized")
    })?;
    Ok(Json(info))
}

/// PUT /api/settings - 更新店铺设置
pub async fn update(
    State(state): State<ServerState>,
    Json(payload): Json<StoreInfoUpdate>,
) -> AppResult<Json<StoreInfo>> {
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(rate) = payload.tax_rate {
        validate_tax_rate(rate)?;
    }
    let repo = StoreInfoRepository::new(state.get_db());
    let info = repo.update(payload).await?;
    Ok(Json(info))
}
