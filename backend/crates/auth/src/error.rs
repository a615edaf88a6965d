//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// The canonical role row was never seeded (process misconfiguration)
    #[error("Internal error, please contact the admin")]
    RoleNotInitialized,

    /// An account with this email already exists
    #[error("An account with this email already exists")]
    DuplicateEmail,

    /// Invalid credentials (unknown email or wrong password, on purpose
    /// indistinguishable to the caller)
    #[error("Invalid credentials")]
    BadCredentials,

    /// Account is locked
    #[error("Account is locked")]
    AccountLocked,

    /// Account has not been activated yet
    #[error("Account is disabled")]
    AccountDisabled,

    /// Activation code does not exist or was already used
    #[error("Invalid activation code")]
    InvalidActivationCode,

    /// Activation code has expired; a fresh one was sent
    #[error("Activation code has expired. A new code has been sent to the same email address")]
    ActivationCodeExpired,

    /// Activation mail could not be dispatched
    #[error("Failed to send activation email")]
    EmailDelivery(String),

    /// Session token rejected (bad signature, expired, or malformed)
    #[error("Invalid session token")]
    InvalidToken,

    /// Malformed email or password shape, rejected at the boundary
    #[error("{0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::BadCredentials
            | AuthError::AccountLocked
            | AuthError::AccountDisabled
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::InvalidActivationCode
            | AuthError::ActivationCodeExpired
            | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::RoleNotInitialized
            | AuthError::EmailDelivery(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::BadCredentials
            | AuthError::AccountLocked
            | AuthError::AccountDisabled
            | AuthError::InvalidToken => ErrorKind::Unauthorized,
            AuthError::InvalidActivationCode
            | AuthError::ActivationCodeExpired
            | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::RoleNotInitialized
            | AuthError::EmailDelivery(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::RoleNotInitialized => {
                tracing::error!("Canonical USER role is missing; role bootstrap did not run");
            }
            AuthError::EmailDelivery(detail) => {
                tracing::error!(detail = %detail, "Activation email dispatch failed");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::BadCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<crate::token::TokenError> for AuthError {
    fn from(_: crate::token::TokenError) -> Self {
        // The caller never learns which of signature/expiry/structure failed
        AuthError::InvalidToken
    }
}
