//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 分类管理接口
//! - [`menu`] - 菜单管理接口 (含批量导入)
//! - [`tables`] - 桌台管理接口
//! - [`orders`] - 订单接口 (下单、状态、支付)
//! - [`requests`] - 服务请求接口
//! - [`settings`] - 店铺设置接口

pub mod categories;
pub mod health;
pub mod menu;
pub mod orders;
pub mod requests;
pub mod settings;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(menu::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(requests::router())
        .merge(settings::router())
}

/// Build a fully configured application with middleware
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // CORS - the QR-code web client is served from another origin
        .layer(CorsLayer::permissive())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
}
