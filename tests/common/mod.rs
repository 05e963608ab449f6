//! 测试公共设施：内存仓储与测试数据工厂

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use chrono::{DateTime, Utc};
use tower::ServiceExt;

use catalog::app::category::model::{Category, CategoryDto};
use catalog::app::category::repository::CategoryRepository;
use catalog::app::category::service::CategoryService;
use catalog::app::product::model::{NewProduct, Product, ProductDto};
use catalog::app::product::repository::ProductRepository;
use catalog::app::product::service::ProductService;
use catalog::core::{Direction, PageRequest, RepositoryError, RepositoryResult};
use catalog::{create_router, AppState};

pub const EXISTING_ID: i64 = 1;
pub const NON_EXISTING_ID: i64 = 1000;
pub const DEPENDENT_ID: i64 = 3;

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, NewProduct>,
    next_category_id: i64,
    next_product_id: i64,
}

/// 同时实现两个仓储接口的内存存储
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    /// 删除时模拟完整性约束失败的商品 id
    dependent_products: Mutex<HashSet<i64>>,
    /// 为 true 时所有操作返回数据库错误
    unavailable: AtomicBool,
    pub product_page_calls: AtomicUsize,
    pub product_delete_calls: AtomicUsize,
    pub product_update_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_category(&self, name: &str) -> Category {
        let mut tables = self.tables.lock().unwrap();
        tables.next_category_id += 1;
        let category = Category {
            id: tables.next_category_id,
            name: name.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        tables.categories.insert(category.id, category.clone());
        category
    }

    pub fn add_product(&self, name: &str, price: f64, category_ids: &[i64]) -> i64 {
        let mut tables = self.tables.lock().unwrap();
        tables.next_product_id += 1;
        let id = tables.next_product_id;
        let product = NewProduct {
            name: name.to_string(),
            description: format!("{} description", name),
            price,
            img_url: Some(format!("https://img.com/{}.png", id)),
            date: fixed_date(),
            category_ids: category_ids.to_vec(),
        };
        tables.products.insert(id, product);
        id
    }

    pub fn mark_dependent(&self, product_id: i64) {
        self.dependent_products.lock().unwrap().insert(product_id);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn product_count(&self) -> usize {
        self.tables.lock().unwrap().products.len()
    }

    fn check_available(&self) -> RepositoryResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database("connection refused".to_string()));
        }
        Ok(())
    }

    fn build_product(tables: &Tables, id: i64, product: &NewProduct) -> Product {
        let categories = product
            .category_ids
            .iter()
            .filter_map(|cid| tables.categories.get(cid).cloned())
            .collect();
        Product {
            id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            img_url: product.img_url.clone(),
            date: product.date,
            categories,
        }
    }
}

fn paginate<T>(items: Vec<T>, request: &PageRequest) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let content = items
        .into_iter()
        .skip(request.offset() as usize)
        .take(request.limit() as usize)
        .collect();
    (content, total)
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn find_all(&self) -> RepositoryResult<Vec<Category>> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().categories.values().cloned().collect())
    }

    async fn find_all_paged(
        &self,
        request: &PageRequest,
    ) -> RepositoryResult<(Vec<Category>, i64)> {
        self.check_available()?;
        let mut all: Vec<Category> =
            self.tables.lock().unwrap().categories.values().cloned().collect();
        if let Some(sort) = &request.sort {
            if sort.property == "name" {
                all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
            }
            if sort.direction == Direction::Desc {
                all.reverse();
            }
        }
        Ok(paginate(all, request))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Category>> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().categories.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepositoryResult<Vec<Category>> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| tables.categories.get(id).cloned())
            .collect())
    }

    async fn insert(&self, name: &str) -> RepositoryResult<Category> {
        self.check_available()?;
        Ok(self.add_category(name))
    }

    async fn update(&self, id: i64, name: &str) -> RepositoryResult<Option<Category>> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.categories.get_mut(&id).map(|category| {
            category.name = name.to_string();
            category.updated_at = Some(Utc::now());
            category.clone()
        }))
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().categories.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        let referenced = tables
            .products
            .values()
            .any(|p| p.category_ids.contains(&id));
        if referenced {
            return Err(RepositoryError::IntegrityViolation(format!(
                "category {} is still referenced",
                id
            )));
        }
        tables.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn find_all_paged(&self, request: &PageRequest) -> RepositoryResult<(Vec<Product>, i64)> {
        self.check_available()?;
        self.product_page_calls.fetch_add(1, Ordering::SeqCst);

        let tables = self.tables.lock().unwrap();
        let mut all: Vec<Product> = tables
            .products
            .iter()
            .map(|(id, p)| Self::build_product(&tables, *id, p))
            .collect();

        if let Some(sort) = &request.sort {
            match sort.property.as_str() {
                "name" => all.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id))),
                "price" => all.sort_by(|a, b| {
                    a.price
                        .partial_cmp(&b.price)
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.id.cmp(&b.id))
                }),
                "date" => all.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id))),
                _ => {}
            }
            if sort.direction == Direction::Desc {
                all.reverse();
            }
        }

        Ok(paginate(all, request))
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .get(&id)
            .map(|p| Self::build_product(&tables, id, p)))
    }

    async fn insert(&self, product: &NewProduct) -> RepositoryResult<Product> {
        self.check_available()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_product_id += 1;
        let id = tables.next_product_id;
        tables.products.insert(id, product.clone());
        Ok(Self::build_product(&tables, id, product))
    }

    async fn update(&self, id: i64, product: &NewProduct) -> RepositoryResult<Option<Product>> {
        self.check_available()?;
        self.product_update_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        tables.products.insert(id, product.clone());
        Ok(Some(Self::build_product(&tables, id, product)))
    }

    async fn exists_by_id(&self, id: i64) -> RepositoryResult<bool> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().products.contains_key(&id))
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        self.check_available()?;
        self.product_delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.dependent_products.lock().unwrap().contains(&id) {
            return Err(RepositoryError::IntegrityViolation(format!(
                "product {} is still referenced",
                id
            )));
        }
        self.tables.lock().unwrap().products.remove(&id);
        Ok(())
    }

    async fn count(&self) -> RepositoryResult<i64> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().products.len() as i64)
    }
}

pub fn fixed_date() -> DateTime<Utc> {
    "2020-10-20T03:00:00Z".parse().unwrap()
}

/// 分类: 1 Electronics, 2 Books, 3 Computers
/// 商品: 1 Phone, 2 Macbook Pro, 3 PC Gamer（删除时违反完整性约束）
pub fn seeded_store() -> Arc<InMemoryStore> {
    let store = InMemoryStore::new();
    store.add_category("Electronics");
    store.add_category("Books");
    store.add_category("Computers");
    store.add_product("Phone", 800.0, &[1]);
    store.add_product("Macbook Pro", 1250.0, &[1, 3]);
    store.add_product("PC Gamer", 1200.0, &[3]);
    store.mark_dependent(DEPENDENT_ID);
    store
}

pub fn services(store: &Arc<InMemoryStore>) -> (CategoryService, ProductService) {
    let categories = CategoryService::new(store.clone());
    let products = ProductService::new(store.clone(), store.clone());
    (categories, products)
}

pub fn app(store: &Arc<InMemoryStore>) -> Router {
    let (categories, products) = services(store);
    create_router(
        AppState::new(categories, products),
        Duration::from_secs(5),
    )
}

pub fn create_category_dto() -> CategoryDto {
    CategoryDto {
        id: Some(1),
        name: "Electronics".to_string(),
    }
}

pub fn create_product_dto() -> ProductDto {
    ProductDto {
        id: None,
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: 800.0,
        img_url: Some("https://img.com/img.png".to_string()),
        date: fixed_date(),
        categories: vec![create_category_dto()],
    }
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
