//! Auth (Authentication & Activation) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases (register, authenticate, activate)
//! - `infra/` - PostgreSQL and mail relay implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Registration creates a disabled account and mails a one-time
//!   numeric activation code
//! - Activation consumes the code (single use, time bounded) and enables
//!   the account; expired codes trigger a resend
//! - Authentication verifies credentials and mints a stateless signed
//!   session token
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, per-call random salt, optional pepper
//! - Session tokens are HMAC-SHA256 signed claim sets verified without a
//!   server-side lookup
//! - Unknown email and wrong password are indistinguishable to the caller

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::mailer::HttpMailer;
pub use infra::postgres::PgAuthRepository;
pub use presentation::router::auth_router;
pub use token::TokenCodec;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgAuthRepository as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
