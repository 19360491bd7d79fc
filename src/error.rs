use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::routes::order::OrderStatus;
use crate::utils::{error_codes, error_to_api_response};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("账号或密码错误")]
    Unauthorized,
    #[error("权限不足")]
    PermissionDenied,
    #[error("{0}不存在")]
    NotFound(&'static str),
    #[error("{msg}")]
    Conflict { code: i32, msg: String },
    #[error("订单状态不能从 {from} 变更为 {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("令牌错误: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("密码处理失败: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// 唯一约束冲突转换为带业务码的 409，其余数据库错误保持不变
    pub fn on_unique(err: sqlx::Error, code: i32, msg: &str) -> Self {
        let unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::Conflict {
                code,
                msg: msg.to_string(),
            }
        } else {
            AppError::Database(err)
        }
    }

    fn status_and_code(&self) -> (StatusCode, i32) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::AUTH_FAILED),
            AppError::PermissionDenied => (StatusCode::FORBIDDEN, error_codes::PERMISSION_DENIED),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AppError::Conflict { code, .. } => (StatusCode::CONFLICT, *code),
            AppError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, error_codes::INVALID_TRANSITION)
            }
            AppError::Database(_)
            | AppError::Token(_)
            | AppError::Hash(_)
            | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let msg = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "内部服务器错误".to_string()
        } else {
            self.to_string()
        };

        (status, error_to_api_response::<()>(code, msg)).into_response()
    }
}
