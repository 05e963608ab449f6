//! 商品仓储

use async_trait::async_trait;

use super::model::{NewProduct, Product};
use crate::core::{PageRequest, RepositoryResult};

/// 商品数据访问接口
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 返回当前页数据（含分类）和总行数
    async fn find_all_paged(&self, request: &PageRequest) -> RepositoryResult<(Vec<Product>, i64)>;

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>>;

    async fn insert(&self, product: &NewProduct) -> RepositoryResult<Product>;

    /// 覆盖全部字段并替换分类关联，商品不存在时返回 `None`
    async fn update(&self, id: i64, product: &NewProduct) -> RepositoryResult<Option<Product>>;

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool>;

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;

    async fn count(&self) -> RepositoryResult<i64>;
}

#[cfg(feature = "database")]
pub use postgres::PgProductRepository;

#[cfg(feature = "database")]
mod postgres {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use sqlx::{PgPool, Postgres, Transaction};

    use super::ProductRepository;
    use crate::app::category::model::Category;
    use crate::app::product::model::{NewProduct, Product};
    use crate::core::{PageRequest, RepositoryError, RepositoryResult};

    const COLUMNS: &str = "id, name, description, price, img_url, date";

    #[derive(sqlx::FromRow)]
    struct ProductRow {
        id: i64,
        name: String,
        description: String,
        price: f64,
        img_url: Option<String>,
        date: DateTime<Utc>,
    }

    impl ProductRow {
        fn into_product(self, categories: Vec<Category>) -> Product {
            Product {
                id: self.id,
                name: self.name,
                description: self.description,
                price: self.price,
                img_url: self.img_url,
                date: self.date,
                categories,
            }
        }
    }

    #[derive(sqlx::FromRow)]
    struct ProductCategoryRow {
        product_id: i64,
        id: i64,
        name: String,
        created_at: DateTime<Utc>,
        updated_at: Option<DateTime<Utc>>,
    }

    #[derive(Clone)]
    pub struct PgProductRepository {
        pool: PgPool,
    }

    impl PgProductRepository {
        pub fn new(pool: PgPool) -> Self {
            Self { pool }
        }

        /// 一次查询取回多个商品的分类，避免 N+1
        async fn load_categories(
            &self,
            rows: Vec<ProductRow>,
        ) -> RepositoryResult<Vec<Product>> {
            if rows.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
            let links = sqlx::query_as::<_, ProductCategoryRow>(
                r#"
                SELECT pc.product_id, c.id, c.name, c.created_at, c.updated_at
                FROM tb_product_category pc
                JOIN tb_category c ON c.id = pc.category_id
                WHERE pc.product_id = ANY($1)
                ORDER BY pc.product_id, c.id
                "#,
            )
            .bind(&ids)
            .fetch_all(&self.pool)
            .await?;

            let mut by_product: HashMap<i64, Vec<Category>> = HashMap::new();
            for link in links {
                by_product.entry(link.product_id).or_default().push(Category {
                    id: link.id,
                    name: link.name,
                    created_at: link.created_at,
                    updated_at: link.updated_at,
                });
            }

            Ok(rows
                .into_iter()
                .map(|row| {
                    let categories = by_product.remove(&row.id).unwrap_or_default();
                    row.into_product(categories)
                })
                .collect())
        }

        async fn load_one(&self, row: Option<ProductRow>) -> RepositoryResult<Option<Product>> {
            match row {
                Some(row) => Ok(self.load_categories(vec![row]).await?.pop()),
                None => Ok(None),
            }
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

    async fn replace_categories(
        tx: &mut Transaction<'_, Postgres>,
        product_id: i64,
        category_ids: &[i64],
    ) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM tb_product_category WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO tb_product_category (product_id, category_id)
            SELECT $1, UNNEST($2::BIGINT[])
            "#,
        )
        .bind(product_id)
        .bind(category_ids)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    #[async_trait]
    impl ProductRepository for PgProductRepository {
        async fn find_all_paged(
            &self,
            request: &PageRequest,
        ) -> RepositoryResult<(Vec<Product>, i64)> {
            let rows = sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {} FROM tb_product ORDER BY {} LIMIT $1 OFFSET $2",
                COLUMNS,
                order_by(request)
            ))
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

            let total = self.count().await?;
            let products = self.load_categories(rows).await?;
            Ok((products, total))
        }

        async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
            let row = sqlx::query_as::<_, ProductRow>(&format!(
                "SELECT {} FROM tb_product WHERE id = $1",
                COLUMNS
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            self.load_one(row).await
        }

        async fn insert(&self, product: &NewProduct) -> RepositoryResult<Product> {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query_as::<_, ProductRow>(&format!(
                r#"
                INSERT INTO tb_product (name, description, price, img_url, date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {}
                "#,
                COLUMNS
            ))
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.img_url)
            .bind(product.date)
            .fetch_one(&mut *tx)
            .await?;

            replace_categories(&mut tx, row.id, &product.category_ids).await?;
            tx.commit().await?;

            let id = row.id;
            self.load_one(Some(row)).await?.ok_or_else(|| {
                RepositoryError::Database(format!("product {} vanished after insert", id))
            })
        }

        async fn update(&self, id: i64, product: &NewProduct) -> RepositoryResult<Option<Product>> {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query_as::<_, ProductRow>(&format!(
                r#"
                UPDATE tb_product
                SET name = $1, description = $2, price = $3, img_url = $4, date = $5
                WHERE id = $6
                RETURNING {}
                "#,
                COLUMNS
            ))
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(&product.img_url)
            .bind(product.date)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = row else {
                tx.rollback().await?;
                return Ok(None);
            };

            replace_categories(&mut tx, id, &product.category_ids).await?;
            tx.commit().await?;

            self.load_one(Some(row)).await
        }

        async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
            let exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM tb_product WHERE id = $1)")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;
            Ok(exists.0)
        }

        async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
            // 商品是关联关系的拥有方，先删关联再删商品
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM tb_product_category WHERE product_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("DELETE FROM tb_product WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;
            Ok(())
        }

        async fn count(&self) -> RepositoryResult<i64> {
            let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tb_product")
                .fetch_one(&self.pool)
                .await?;
            Ok(total.0)
        }
    }
}
