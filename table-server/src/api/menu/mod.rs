//! Menu API 模块 (点餐菜单 + 菜品管理 + 批量导入)

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::board))
        .route("/items", get(handler::list).post(handler::create))
        .route(
            "/items/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/items/{id}/availability", patch(handler::set_availability))
        .route("/import", post(handler::import))
        .route("/import/validate", post(handler::validate_import))
}
