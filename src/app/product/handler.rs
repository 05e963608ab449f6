//! 商品处理器

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};

use super::{model::ProductDto, service::PRODUCT_SORT_FIELDS};
use crate::app::AppState;
use crate::core::{CoreError, JsonBody, Page, PageParams, PathParam, QueryParams};

pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PageParams>,
) -> Result<Json<Page<ProductDto>>, CoreError> {
    let request = params.into_request(PRODUCT_SORT_FIELDS)?;
    let page = state.products.find_all_paged(request).await?;
    Ok(Json(page))
}

pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ProductDto>, CoreError> {
    let dto = state.products.find_by_id(id).await?;
    Ok(Json(dto))
}

pub async fn create_product(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<ProductDto>,
) -> Result<impl IntoResponse, CoreError> {
    let dto = state.products.insert(payload).await?;
    let location = format!("/products/{}", dto.id.unwrap_or_default());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dto)))
}

pub async fn update_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<ProductDto>,
) -> Result<Json<ProductDto>, CoreError> {
    let dto = state.products.update(id, payload).await?;
    Ok(Json(dto))
}

pub async fn delete_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, CoreError> {
    state.products.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
