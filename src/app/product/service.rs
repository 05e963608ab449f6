//! 商品业务服务

use std::sync::Arc;

use tracing::{debug, info};
use validator::Validate;

use super::model::ProductDto;
use super::repository::ProductRepository;
use crate::app::category::repository::CategoryRepository;
use crate::core::{CoreError, CoreResult, FieldMessage, Page, PageRequest};

/// 允许排序的字段
pub const PRODUCT_SORT_FIELDS: &[&str] = &["id", "name", "price", "date"];

#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    category_repository: Arc<dyn CategoryRepository>,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    pub async fn find_all_paged(&self, request: PageRequest) -> CoreResult<Page<ProductDto>> {
        let (content, total) = self.repository.find_all_paged(&request).await?;
        debug!(
            "Loaded product page {} ({} of {} rows)",
            request.page,
            content.len(),
            total
        );
        Ok(Page::new(content, &request, total).map(ProductDto::from))
    }

    pub async fn find_by_id(&self, id: i64) -> CoreResult<ProductDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(ProductDto::from)
            .ok_or_else(|| CoreError::NotFound("Entity not found".to_string()))
    }

    pub async fn insert(&self, dto: ProductDto) -> CoreResult<ProductDto> {
        let dto = dto.normalized();
        dto.validate()?;
        let category_ids = self.resolve_categories(&dto).await?;

        let entity = self
            .repository
            .insert(&dto.into_new_product(category_ids))
            .await?;
        info!("Created product: {} ({})", entity.name, entity.id);
        Ok(ProductDto::from(entity))
    }

    pub async fn update(&self, id: i64, dto: ProductDto) -> CoreResult<ProductDto> {
        let dto = dto.normalized();
        dto.validate()?;

        if !self.repository.exists_by_id(id).await? {
            return Err(CoreError::NotFound(format!("ID not found: {}", id)));
        }
        let category_ids = self.resolve_categories(&dto).await?;

        let entity = self
            .repository
            .update(id, &dto.into_new_product(category_ids))
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("ID not found: {}", id)))?;
        info!("Updated product: {} ({})", entity.name, entity.id);
        Ok(ProductDto::from(entity))
    }

    pub async fn delete(&self, id: i64) -> CoreResult<()> {
        if !self.repository.exists_by_id(id).await? {
            return Err(CoreError::NotFound("Resource not found".to_string()));
        }

        self.repository.delete_by_id(id).await?;
        info!("Deleted product: {}", id);
        Ok(())
    }

    pub async fn count(&self) -> CoreResult<i64> {
        Ok(self.repository.count().await?)
    }

    /// 引用的分类必须全部存在
    async fn resolve_categories(&self, dto: &ProductDto) -> CoreResult<Vec<i64>> {
        if dto.categories.iter().any(|c| c.id.is_none()) {
            return Err(CoreError::Validation(vec![FieldMessage {
                field_name: "categories".to_string(),
                message: "Category id is required".to_string(),
            }]));
        }

        let ids = dto.category_ids();
        let found = self.category_repository.find_by_ids(&ids).await?;

        if let Some(missing) = ids.iter().find(|id| !found.iter().any(|c| c.id == **id)) {
            return Err(CoreError::NotFound(format!(
                "Category not found: {}",
                missing
            )));
        }

        Ok(ids)
    }
}
