//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | POST | 下单 (结账) |
//! | /api/orders | GET | 订单列表 |
//! | /api/orders | DELETE | 清空订单 (管理员) |
//! | /api/orders/{id} | GET | 订单详情 |
//! | /api/orders/{id}/status | PATCH | 推进订单状态 |
//! | /api/orders/{id}/cancel | POST | 取消订单 |
//! | /api/orders/{id}/payment/intent | POST | 创建支付意向 |
//! | /api/orders/{id}/payment/confirm | POST | 确认支付 |
//! | /api/orders/{id}/payment/refund | POST | 退款 |

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list)
                .post(handler::checkout)
                .delete(handler::reset_all),
        )
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::set_status))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/payment/intent", post(handler::create_payment_intent))
        .route("/{id}/payment/confirm", post(handler::confirm_payment))
        .route("/{id}/payment/refund", post(handler::refund_payment))
}
