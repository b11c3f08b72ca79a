//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::OrderStatus;
use shared::cart::CheckoutRequest;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCancel, OrderStatusUpdate};
use crate::db::repository::OrderRepository;
use crate::orders;
use crate::payment::PaymentIntent;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
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

/// GET /api/orders - 订单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = match (query.status, query.table) {
        (Some(status), None) => repo.find_by_status(status).await?,
        (None, Some(table)) => repo.find_by_table(&table).await?,
        (None, None) => repo.find_all(query.limit, query.offset).await?,
        (Some(_), Some(_)) => {
            return Err(AppError::invalid_request(
                "Filter by either status or table, not both",
            ));
        }
    };
    Ok(Json(orders))
}

/// GET /api/orders/:id - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::OrderNotFound, format!("Order {} not found", id))
    })?;
    Ok(Json(order))
}

/// POST /api/orders - 下单 (结账)
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<Order>> {
    let order = orders::checkout(&state, payload).await?;
    Ok(Json(order))
}

/// PATCH /api/orders/:id/status - 推进订单状态
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = orders::advance(&state, &id, payload.status, payload.staff_notes).await?;
    Ok(Json(order))
}

/// 管理员重置响应
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub reset: bool,
}

/// DELETE /api/orders - 管理员清空订单数据
pub async fn reset_all(State(state): State<ServerState>) -> AppResult<Json<ResetResponse>> {
    orders::reset_all(&state).await?;
    Ok(Json(ResetResponse { reset: true }))
}

/// POST /api/orders/:id/cancel - 取消订单
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderCancel>,
) -> AppResult<Json<Order>> {
    let order = orders::cancel(&state, &id, payload.reason).await?;
    Ok(Json(order))
}

/// 支付意向响应: 订单 + 提供商意向
#[derive(Debug, Serialize)]
pub struct PaymentIntentResponse {
    pub order: Order,
    pub intent: PaymentIntent,
}

/// POST /api/orders/:id/payment/intent - 创建支付意向
pub async fn create_payment_intent(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let (order, intent) = orders::create_payment_intent(&state, &id).await?;
    Ok(Json(PaymentIntentResponse { order, intent }))
}

/// POST /api/orders/:id/payment/confirm - 确认支付
pub async fn confirm_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = orders::confirm_payment(&state, &id).await?;
    Ok(Json(order))
}

/// POST /api/orders/:id/payment/refund - 退款
pub async fn refund_payment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let order = orders::refund_payment(&state, &id).await?;
    Ok(Json(order))
}
