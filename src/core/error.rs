//! 核心错误处理模块
//!
//! 仓储层返回 [`RepositoryError`]，服务层将其翻译为 [`CoreError`]，
//! 处理器再把 [`CoreError`] 转换为 HTTP 响应。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Database(String),

    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldMessage>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// 单个字段的校验失败信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMessage {
    pub field_name: String,
    pub message: String,
}

/// 错误响应结构
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldMessage>,
}

impl CoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Database(_) | CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error, message, errors) = match self {
            CoreError::NotFound(msg) => ("Resource not found", msg, Vec::new()),
            CoreError::Database(msg) => ("Database exception", msg, Vec::new()),
            CoreError::Validation(fields) => (
                "Validation exception",
                "Invalid data".to_string(),
                fields,
            ),
            CoreError::BadRequest(msg) => ("Bad request", msg, Vec::new()),
            CoreError::Internal(msg) => {
                // 内部细节只写日志，不返回给调用方
                error!("Internal error: {}", msg);
                (
                    "Internal server error",
                    "Unexpected error".to_string(),
                    Vec::new(),
                )
            }
        };

        let error_response = ErrorResponse {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: error.to_string(),
            message,
            errors,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<FieldMessage> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldMessage {
                    field_name: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        // HashMap 迭代顺序不稳定
        messages.sort_by(|a, b| {
            a.field_name
                .cmp(&b.field_name)
                .then_with(|| a.message.cmp(&b.message))
        });

        CoreError::Validation(messages)
    }
}

/// 仓储层错误
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// 违反外键等完整性约束
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(feature = "database")]
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return RepositoryError::IntegrityViolation(db_err.message().to_string());
            }
        }
        RepositoryError::Database(err.to_string())
    }
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::IntegrityViolation(detail) => {
                tracing::warn!("Integrity violation: {}", detail);
                CoreError::Database("Integrity violation".to_string())
            }
            RepositoryError::Database(msg) => CoreError::Internal(msg),
        }
    }
}
