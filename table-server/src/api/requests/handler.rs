//! Service Request API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{ServiceRequest, ServiceRequestCreate, ServiceRequestStatusUpdate};
use crate::db::repository::ServiceRequestRepository;
use crate::requests;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Query params for listing requests
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Only open requests (the staff board), most urgent first
    #[serde(default)]
    pub open: bool,
    /// Filter by dining table record id
    pub table: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/requests - 请求列表 (?open=true 为员工看板)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ServiceRequest>>> {
    let repo = ServiceRequestRepository::new(state.get_db());
    let requests = if query.open {
        repo.find_open().await?
    } else if let Some(table) = query.table {
        repo.find_by_table(&table).await?
    } else {
        repo.find_all(query.limit, query.offset).await?
    };
    Ok(Json(requests))
}

/// GET /api/requests/:id - 请求详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ServiceRequest>> {
    let repo = ServiceRequestRepository::new(state.get_db());
    let request = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::RequestNotFound,
            format!("Service request {} not found", id),
        )
    })?;
    Ok(Json(request))
}

/// POST /api/requests - 客人呼叫服务
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ServiceRequestCreate>,
) -> AppResult<Json<ServiceRequest>> {
    let request = requests::create(&state, payload).await?;
    Ok(Json(request))
}

/// PATCH /api/requests/:id/status - 员工处理请求
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ServiceRequestStatusUpdate>,
) -> AppResult<Json<ServiceRequest>> {
    let request = requests::transition(&state, &id, payload.status, payload.staff_notes).await?;
    Ok(Json(request))
}
