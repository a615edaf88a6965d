//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{
    ActivationTokenRepository, EmailSender, RoleRepository, UserRepository,
};
use crate::infra::mailer::HttpMailer;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router with PostgreSQL repository and HTTP mail relay
pub fn auth_router(repo: PgAuthRepository, mailer: HttpMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create a generic Auth router for any repository/mailer implementation
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: UserRepository
        + ActivationTokenRepository
        + RoleRepository
        + Clone
        + Send
        + Sync
        + 'static,
    M: EmailSender + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        mailer: Arc::new(mailer),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R, M>))
        .route("/authenticate", post(handlers::authenticate::<R, M>))
        .route("/activate", get(handlers::activate::<R, M>))
        .with_state(state)
}
