//! 商品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::category::model::{Category, CategoryDto};
use crate::app::validation::{not_blank, not_in_future};

/// 商品实体，`categories` 按 id 升序
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    pub categories: Vec<Category>,
}

/// 写入商品时使用的数据，分类已解析为 id
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub img_url: Option<String>,
    pub date: DateTime<Utc>,
    pub category_ids: Vec<i64>,
}

/// 商品 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(length(min = 5, max = 60, message = "Must have 5-60 characters"))]
    pub name: String,

    #[validate(custom(function = "not_blank", message = "Required field"))]
    pub description: String,

    #[validate(range(exclusive_min = 0.0, message = "Price must be positive"))]
    pub price: f64,

    #[serde(default)]
    #[validate(length(max = 255, message = "Must have at most 255 characters"))]
    pub img_url: Option<String>,

    #[validate(custom(
        function = "not_in_future",
        message = "Product date cannot be in the future"
    ))]
    pub date: DateTime<Utc>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Product must have at least one category"))]
    pub categories: Vec<CategoryDto>,
}

impl ProductDto {
    /// 去掉文本字段首尾空白，空白图片地址视为未填写；校验之前调用
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.description = self.description.trim().to_string();
        self.img_url = self
            .img_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self
    }

    /// 去重后的分类 id，缺少 id 的分类被视为无效引用
    pub fn category_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.categories.iter().filter_map(|c| c.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn into_new_product(self, category_ids: Vec<i64>) -> NewProduct {
        NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            img_url: self.img_url,
            date: self.date,
            category_ids,
        }
    }
}

impl From<Product> for ProductDto {
    fn from(entity: Product) -> Self {
        Self {
            id: Some(entity.id),
            name: entity.name,
            description: entity.description,
            price: entity.price,
            img_url: entity.img_url,
            date: entity.date,
            categories: entity.categories.into_iter().map(CategoryDto::from).collect(),
        }
    }
}
