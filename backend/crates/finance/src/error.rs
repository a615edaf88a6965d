//! Finance Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Finance-specific result type alias
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Finance-specific error variants
#[derive(Debug, Error)]
pub enum FinanceError {
    /// Category does not exist or belongs to another user
    #[error("Category not found")]
    CategoryNotFound,

    /// Transaction does not exist or belongs to another user
    #[error("Transaction not found")]
    TransactionNotFound,

    /// Request payload rejected
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FinanceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            FinanceError::CategoryNotFound | FinanceError::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            FinanceError::Validation(_) => StatusCode::BAD_REQUEST,
            FinanceError::Database(_) | FinanceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            FinanceError::CategoryNotFound | FinanceError::TransactionNotFound => {
                ErrorKind::NotFound
            }
            FinanceError::Validation(_) => ErrorKind::BadRequest,
            FinanceError::Database(_) | FinanceError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            FinanceError::Database(e) => {
                tracing::error!(error = %e, "Finance database error");
            }
            FinanceError::Internal(msg) => {
                tracing::error!(message = %msg, "Finance internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Finance error");
            }
        }
    }
}

impl IntoResponse for FinanceError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
