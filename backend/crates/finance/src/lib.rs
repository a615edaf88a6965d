//! Finance Backend Module
//!
//! Category and transaction CRUD for the finance tracker. Plain data
//! access behind the auth middleware; the only rule enforced here is
//! ownership scoping (every query is bound to the authenticated owner).

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use error::{FinanceError, FinanceResult};
pub use infra::postgres::PgFinanceRepository;
pub use presentation::router::finance_router;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgFinanceRepository as FinanceStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}
