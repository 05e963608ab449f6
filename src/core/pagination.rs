//! 分页与排序

use serde::{Deserialize, Serialize};

use super::error::CoreError;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// 排序规则，`property` 一定来自调用方给出的白名单
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    /// 解析 `name`、`name,asc`、`price,DESC` 形式的排序参数
    pub fn parse(raw: &str, allowed: &[&str]) -> Result<Self, CoreError> {
        let mut parts = raw.split(',').map(str::trim);
        let property = parts.next().unwrap_or_default();

        if !allowed.contains(&property) {
            return Err(CoreError::BadRequest(format!(
                "Unknown sort property '{}', expected one of {:?}",
                property, allowed
            )));
        }

        let direction = match parts.next() {
            None | Some("") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => Direction::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => Direction::Desc,
            Some(d) => {
                return Err(CoreError::BadRequest(format!(
                    "Unknown sort direction '{}'",
                    d
                )))
            }
        };

        if parts.next().is_some() {
            return Err(CoreError::BadRequest(format!(
                "Malformed sort parameter '{}'",
                raw
            )));
        }

        Ok(Self {
            property: property.to_string(),
            direction,
        })
    }
}

/// 分页请求，页码从 0 开始
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> i64 {
        self.page as i64 * self.size as i64
    }

    pub fn limit(&self) -> i64 {
        self.size as i64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(0, DEFAULT_PAGE_SIZE)
    }
}

/// 查询参数: `?page=0&size=12&sort=name,asc`
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
    #[serde(default)]
    pub sort: Option<String>,
}

impl PageParams {
    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.size.is_none() && self.sort.is_none()
    }

    pub fn into_request(self, allowed_sort: &[&str]) -> Result<PageRequest, CoreError> {
        let mut request = PageRequest::of(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
        );

        if let Some(raw) = self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            request = request.with_sort(Sort::parse(raw, allowed_sort)?);
        }

        Ok(request)
    }
}

/// 分页结果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: i64,
    pub total_pages: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = request.size.max(1);
        let total = total_elements.max(0) as u64;
        let total_pages = total.div_ceil(size as u64) as u32;
        let number_of_elements = content.len();

        Self {
            number: request.page,
            size,
            total_elements,
            total_pages,
            number_of_elements,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
            empty: content.is_empty(),
            content,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}
