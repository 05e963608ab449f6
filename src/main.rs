//! 商品目录服务入口

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use catalog::app::category::{repository::PgCategoryRepository, service::CategoryService};
use catalog::app::product::{repository::PgProductRepository, service::ProductService};
use catalog::config::load_config;
use catalog::infrastructure::{DatabaseManager, Logger};
use catalog::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (config, config_path) = load_config().context("failed to load configuration")?;

    Logger::init(&config.logging);
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    info!("Connecting to database: {}", config.redacted_database_url());
    let database = DatabaseManager::new(&config.database)
        .await
        .context("failed to connect to database")?;
    database.ping().await.context("database ping failed")?;

    if config.database.run_migrations {
        database.migrate().await.context("failed to create tables")?;
    }
    if config.database.seed {
        database.seed().await.context("failed to seed database")?;
    }

    let pool = database.get_pool().clone();
    let category_repository = Arc::new(PgCategoryRepository::new(pool.clone()));
    let product_repository = Arc::new(PgProductRepository::new(pool));

    let state = AppState::new(
        CategoryService::new(category_repository.clone()),
        ProductService::new(product_repository, category_repository),
    );

    let app = create_router(state, Duration::from_secs(config.http.timeout_seconds));

    let addr = format!("{}:{}", config.http.bind_address, config.http.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("🚀 Catalog server running on http://{}", listener.local_addr()?);
    info!("📖 API endpoints:");
    info!("   GET    /health");
    info!("   GET    /categories          - list (add ?page=&size=&sort= for paging)");
    info!("   POST   /categories");
    info!("   GET    /categories/:id");
    info!("   PUT    /categories/:id");
    info!("   DELETE /categories/:id");
    info!("   GET    /products            - ?page=0&size=12&sort=name,asc");
    info!("   POST   /products");
    info!("   GET    /products/:id");
    info!("   PUT    /products/:id");
    info!("   DELETE /products/:id");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
