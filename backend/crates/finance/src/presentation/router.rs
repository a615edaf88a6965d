//! Finance Router

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;

use auth::middleware::{AuthMiddlewareState, require_session};

use crate::domain::repository::{CategoryRepository, TransactionRepository};
use crate::infra::postgres::PgFinanceRepository;
use crate::presentation::handlers::{self, FinanceAppState};

/// Create the finance router with PostgreSQL repository
///
/// Every route requires a valid session token; the middleware injects
/// `CurrentUser` for the handlers.
pub fn finance_router(repo: PgFinanceRepository, auth: AuthMiddlewareState) -> Router {
    finance_router_generic(repo, auth)
}

/// Create a generic finance router for any repository implementation
pub fn finance_router_generic<R>(repo: R, auth: AuthMiddlewareState) -> Router
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let state = FinanceAppState {
        repo: Arc::new(repo),
    };

    let guard = axum::middleware::from_fn(move |req: Request<Body>, next: Next| {
        let auth = auth.clone();
        async move { require_session(auth, req, next).await }
    });

    Router::new()
        .route("/categories", post(handlers::create_category::<R>))
        .route("/categories", get(handlers::list_categories::<R>))
        .route("/categories/{id}", get(handlers::get_category::<R>))
        .route("/categories/{id}", patch(handlers::update_category::<R>))
        .route("/categories/{id}", delete(handlers::delete_category::<R>))
        .route("/transactions", post(handlers::create_transaction::<R>))
        .route("/transactions", get(handlers::list_transactions::<R>))
        .route("/transactions/{id}", get(handlers::get_transaction::<R>))
        .route("/transactions/{id}", patch(handlers::update_transaction::<R>))
        .route("/transactions/{id}", delete(handlers::delete_transaction::<R>))
        .route_layer(guard)
        .with_state(state)
}
