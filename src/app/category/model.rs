//! 分类数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::app::validation::not_blank;

/// 分类实体
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// 分类 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryDto {
    #[serde(default)]
    pub id: Option<i64>,

    #[validate(
        custom(function = "not_blank", message = "Required field"),
        length(max = 255, message = "Must have at most 255 characters")
    )]
    pub name: String,
}

impl CategoryDto {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// 去掉名称首尾空白，校验之前调用
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

impl From<&Category> for CategoryDto {
    fn from(entity: &Category) -> Self {
        Self {
            id: Some(entity.id),
            name: entity.name.clone(),
        }
    }
}

impl From<Category> for CategoryDto {
    fn from(entity: Category) -> Self {
        Self {
            id: Some(entity.id),
            name: entity.name,
        }
    }
}
