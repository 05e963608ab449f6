//! 分类仓储

use async_trait::async_trait;

use super::model::Category;
use crate::core::{PageRequest, RepositoryResult};

/// 分类数据访问接口
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_all(&self) -> RepositoryResult<Vec<Category>>;

    /// 返回当前页数据和总行数
    async fn find_all_paged(&self, request: &PageRequest)
        -> RepositoryResult<(Vec<Category>, i64)>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>>;

    /// 按 id 批量查找，不存在的 id 直接忽略
    async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Category>>;

    async fn insert(&self, name: &str) -> RepositoryResult<Category>;

    async fn update(&self, id: i64, name: &str) -> RepositoryResult<Option<Category>>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    /// 仍被商品引用时返回 `RepositoryError::IntegrityViolation`
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
}

#[cfg(feature = "database")]
pub use postgres::PgCategoryRepository;

#[cfg(feature = "database")]
mod postgres {
    use async_trait::async_trait;
    use sqlx::PgPool;

    use super::CategoryRepository;
    use crate::app::category::model::Category;
    use crate::core::{PageRequest, RepositoryResult};

    const COLUMNS: &str = "id, name, created_at, updated_at";

    #[derive(Clone)]
    pub struct PgCategoryRepository {
        pool: PgPool,
    }

    impl PgCategoryRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }
    }

    fn order_by(request: &PageRequest) -> String {
        match &request.sort {
            // property 已经过白名单校验
            Some(sort) if sort.property != "id" => {
                format!("{} {}, id ASC", sort.property, sort.direction.as_sql())
            }
            Some(sort) => format!("id {}", sort.direction.as_sql()),
            None => "id ASC".to_string(),
        }
    }

    #[async_trait]
    impl CategoryRepository for PgCategoryRepository {
        async fn find_all(&self) -> RepositoryResult<Vec<Category>> {
            let categories = sqlx::query_as::<_, Category>(&format!(
                "SELECT {} FROM tb_category ORDER BY id",
                COLUMNS
            ))
            .fetch_all(&self.pool)
            .await?;
            Ok(categories)
        }

        async fn find_all_paged(
            &self,
            request: &PageRequest,
        ) -> RepositoryResult<(Vec<Category>, i64)> {
            let categories = sqlx::query_as::<_, Category>(&format!(
                "SELECT {} FROM tb_category ORDER BY {} LIMIT $1 OFFSET $2",
                COLUMNS,
                order_by(request)
            ))
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tb_category")
                .fetch_one(&self.pool)
                .await?;

            Ok((categories, total.0))
        }

        async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
            let category = sqlx::query_as::<_, Category>(&format!(
                "SELECT {} FROM tb_category WHERE id = $1",
                COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(category)
        }

        async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Category>> {
            let categories = sqlx::query_as::<_, Category>(&format!(
                "SELECT {} FROM tb_category WHERE id = ANY($1) ORDER BY id",
                COLUMNS
            ))
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
            Ok(categories)
        }

        async fn insert(&self, name: &str) -> RepositoryResult<Category> {
            let category = sqlx::query_as::<_, Category>(&format!(
                "INSERT INTO tb_category (name) VALUES ($1) RETURNING {}",
                COLUMNS
            ))
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
            Ok(category)
        }

        async fn update(&self, id: i64, name: &str) -> RepositoryResult<Option<Category>> {
            let category = sqlx::query_as::<_, Category>(&format!(
                "UPDATE tb_category SET name = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
                COLUMNS
            ))
            .bind(name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(category)
        }

        async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tb_category WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(exists.0)
        }

        async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
            sqlx::query("DELETE FROM tb_category WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(())
        }
    }
}
