//! 核心层：错误处理、提取器、分页、中间件

pub mod error;
pub mod extract;
pub mod middleware;
pub mod pagination;

pub use error::{CoreError, CoreResult, FieldMessage, RepositoryError, RepositoryResult};
pub use extract::{JsonBody, PathParam, QueryParams};
pub use pagination::{Direction, Page, PageParams, PageRequest, Sort};
