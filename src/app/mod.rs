//! 应用层：路由与共享状态

pub mod category;
pub mod product;
pub mod validation;

use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::error;

use crate::core::middleware::request_logging_middleware;
use category::service::CategoryService;
use product::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub categories: CategoryService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(categories: CategoryService, products: ProductService) -> Self {
        Self {
            categories,
            products,
        }
    }
}

/// 健康检查，顺带验证数据库可用
async fn health_check(State(state): State<AppState>) -> Response {
    match state.products.count().await {
        Ok(products) => Json(serde_json::json!({
            "status": "healthy",
            "database": "connected",
            "products": products,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
        .into_response(),
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "database": "unavailable",
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                })),
            )
                .into_response()
        }
    }
}

/// 组装完整路由
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(category::routes())
        .merge(product::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                )
                .layer(TimeoutLayer::new(request_timeout))
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}
