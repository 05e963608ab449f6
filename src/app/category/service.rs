//! 分类业务服务

use std::sync::Arc;

use tracing::info;
use validator::Validate;

use super::model::CategoryDto;
use super::repository::CategoryRepository;
use crate::core::{CoreError, CoreResult, Page, PageRequest};

/// 允许排序的字段
pub const CATEGORY_SORT_FIELDS: &[&str] = &["id", "name"];

#[derive(Clone)]
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> CoreResult<Vec<CategoryDto>> {
        let list = self.repository.find_all().await?;
        Ok(list.into_iter().map(CategoryDto::from).collect())
    }

    pub async fn find_all_paged(&self, request: PageRequest) -> CoreResult<Page<CategoryDto>> {
        let (content, total) = self.repository.find_all_paged(&request).await?;
        Ok(Page::new(content, &request, total).map(CategoryDto::from))
    }

    pub async fn find_by_id(&self, id: i64) -> CoreResult<CategoryDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(CategoryDto::from)
            .ok_or_else(|| CoreError::NotFound("Category not found".to_string()))
    }

    pub async fn insert(&self, dto: CategoryDto) -> CoreResult<CategoryDto> {
        let dto = dto.normalized();
        dto.validate()?;

        let entity = self.repository.insert(&dto.name).await?;
        info!("Created category: {} ({})", entity.name, entity.id);
        Ok(CategoryDto::from(entity))
    }

    pub async fn update(&self, id: i64, dto: CategoryDto) -> CoreResult<CategoryDto> {
        let dto = dto.normalized();
        dto.validate()?;

        let entity = self
            .repository
            .update(id, &dto.name)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("ID not found: {}", id)))?;
        info!("Updated category: {} ({})", entity.name, entity.id);
        Ok(CategoryDto::from(entity))
    }

    pub async fn delete(&self, id: i64) -> CoreResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CoreError::NotFound("Resource not found".to_string()));
        }

        self.repository.delete_by_id(id).await?;
        info!("Deleted category: {}", id);
        Ok(())
    }
}
