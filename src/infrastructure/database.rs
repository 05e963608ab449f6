//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等）
    ///
    /// 关联表的外键不级联删除：删除仍被商品引用的分类会触发完整性错误。
    pub async fn migrate(&self) -> Result<(), Error> {
        info!("Creating database tables...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tb_category (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tb_product (
                id BIGSERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                price DOUBLE PRECISION NOT NULL,
                img_url VARCHAR(255),
                date TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tb_product_category (
                product_id BIGINT NOT NULL REFERENCES tb_product (id),
                category_id BIGINT NOT NULL REFERENCES tb_category (id),
                PRIMARY KEY (product_id, category_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// 空库时写入示例目录
    pub async fn seed(&self) -> Result<(), Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tb_category")
            .fetch_one(&self.pool)
            .await?;

        if count.0 > 0 {
            info!("Database already contains data, skipping seed");
            return Ok(());
        }

        info!("Seeding database with example catalog...");
        let mut tx = self.pool.begin().await?;

        let mut category_ids = Vec::new();
        for name in SEED_CATEGORIES {
            let id: (i64,) =
                sqlx::query_as("INSERT INTO tb_category (name) VALUES ($1) RETURNING id")
                    .bind(name)
                    .fetch_one(&mut *tx)
                    .await?;
            category_ids.push(id.0);
        }

        for (index, seed) in SEED_PRODUCTS.iter().enumerate() {
            let date = chrono::DateTime::parse_from_rfc3339(seed.date)
                .map(|d| d.with_timezone(&chrono::Utc))
                .map_err(|e| Error::Decode(Box::new(e)))?;

            let product_id: (i64,) = sqlx::query_as(
                r#"
                INSERT INTO tb_product (name, description, price, img_url, date)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(seed.name)
            .bind(DESCRIPTION)
            .bind(seed.price)
            .bind(format!("https://img.example.com/catalog/{}-big.jpg", index + 1))
            .bind(date)
            .fetch_one(&mut *tx)
            .await?;

            for category in seed.categories {
                sqlx::query(
                    "INSERT INTO tb_product_category (product_id, category_id) VALUES ($1, $2)",
                )
                .bind(product_id.0)
                .bind(category_ids[*category])
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        info!(
            "Database seeded with {} categories and {} products",
            SEED_CATEGORIES.len(),
            SEED_PRODUCTS.len()
        );
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

const SEED_CATEGORIES: [&str; 3] = ["Books", "Electronics", "Computers"];

const DESCRIPTION: &str =
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

struct SeedProduct {
    name: &'static str,
    price: f64,
    date: &'static str,
    /// `SEED_CATEGORIES` 下标
    categories: &'static [usize],
}

const fn seed(
    name: &'static str,
    price: f64,
    date: &'static str,
    categories: &'static [usize],
) -> SeedProduct {
    SeedProduct {
        name,
        price,
        date,
        categories,
    }
}

const SEED_PRODUCTS: [SeedProduct; 25] = [
    seed("The Lord of the Rings", 90.5, "2020-07-13T20:50:07.12345Z", &[0]),
    seed("Smart TV", 2190.0, "2020-07-14T10:00:00Z", &[1, 2]),
    seed("Macbook Pro", 1250.0, "2020-07-14T10:00:00Z", &[1, 2]),
    seed("PC Gamer", 1200.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer X", 1350.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Alfa", 1850.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Tera", 1950.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Y", 1700.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Nitro", 1450.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Card", 1850.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Plus", 1350.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Hex", 1600.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Turbo", 1900.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Hot", 1350.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Ez", 1750.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Tr", 1650.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Tx", 1680.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Er", 1850.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Min", 2250.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Boo", 2350.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Foo", 4340.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Max", 1950.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Hu", 1110.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Weed", 2200.0, "2020-07-14T10:00:00Z", &[2]),
    seed("PC Gamer Tik", 1950.0, "2020-07-14T10:00:00Z", &[2]),
];
