//! 会员积分服务错误类型
//!
//! 定义服务层的业务错误和系统错误，以及到 HTTP 响应的映射

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// 会员积分服务错误类型
#[derive(Debug, Error)]
pub enum LoyaltyError {
    // === 参数错误 ===
    #[error("无效的用户 ID: {0}")]
    InvalidUserId(i64),

    #[error("积分不能为负数: {0}")]
    NegativePoints(i32),

    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 权限错误 ===
    #[error("未登录")]
    Unauthenticated,

    #[error("权限不足: {0}")]
    Forbidden(String),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
}

/// 会员积分服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LoyaltyError>;

impl LoyaltyError {
    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUserId(_) => "INVALID_USER_ID",
            Self::NegativePoints(_) => "NEGATIVE_POINTS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUserId(_) | Self::NegativePoints(_) | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<validator::ValidationErrors> for LoyaltyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for LoyaltyError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(LoyaltyError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(!LoyaltyError::NegativePoints(-1).is_retryable());
        assert!(!LoyaltyError::Unauthenticated.is_retryable());
    }

    #[test]
    fn test_error_code_and_status() {
        let err = LoyaltyError::NegativePoints(-5);
        assert_eq!(err.error_code(), "NEGATIVE_POINTS");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("-5"));

        assert_eq!(
            LoyaltyError::Unauthenticated.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            LoyaltyError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_hides_database_detail() {
        let response = LoyaltyError::Database(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
