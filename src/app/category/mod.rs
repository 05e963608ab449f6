//! 分类模块

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

use axum::{routing::get, Router};

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/categories",
            get(handler::list_categories).post(handler::create_category),
        )
        .route(
            "/categories/:id",
            get(handler::get_category)
                .put(handler::update_category)
                .delete(handler::delete_category),
        )
}
