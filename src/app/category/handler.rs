//! 分类处理器

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};

use super::{model::CategoryDto, service::CATEGORY_SORT_FIELDS};
use crate::app::AppState;
use crate::core::{CoreError, JsonBody, PageParams, PathParam, QueryParams};

/// 不带分页参数时返回完整列表，否则返回分页结果
pub async fn list_categories(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<PageParams>,
) -> Result<Response, CoreError> {
    if params.is_empty() {
        let list = state.categories.find_all().await?;
        return Ok(Json(list).into_response());
    }

    let request = params.into_request(CATEGORY_SORT_FIELDS)?;
    let page = state.categories.find_all_paged(request).await?;
    Ok(Json(page).into_response())
}

pub async fn get_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<CategoryDto>, CoreError> {
    let dto = state.categories.find_by_id(id).await?;
    Ok(Json(dto))
}

pub async fn create_category(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CategoryDto>,
) -> Result<impl IntoResponse, CoreError> {
    let dto = state.categories.insert(payload).await?;
    let location = format!("/categories/{}", dto.id.unwrap_or_default());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(dto)))
}

pub async fn update_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
    JsonBody(payload): JsonBody<CategoryDto>,
) -> Result<Json<CategoryDto>, CoreError> {
    let dto = state.categories.update(id, payload).await?;
    Ok(Json(dto))
}

pub async fn delete_category(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<StatusCode, CoreError> {
    state.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
