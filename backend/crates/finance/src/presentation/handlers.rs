//! HTTP Handlers
//!
//! All routes sit behind the auth middleware; the verified identity
//! arrives as a `CurrentUser` request extension.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, response::IntoResponse};
use std::sync::Arc;
use uuid::Uuid;

use auth::middleware::CurrentUser;

use crate::application::{
    CategoryInput, CategoryService, TransactionInput, TransactionService,
};
use crate::domain::repository::{CategoryRepository, TransactionRepository};
use crate::domain::value_objects::{CategoryId, TransactionId};
use crate::error::FinanceResult;
use crate::presentation::dto::{
    CategoryRequest, CategoryResponse, TransactionRequest, TransactionResponse,
};

/// Shared state for finance handlers
#[derive(Clone)]
pub struct FinanceAppState<R>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

// ============================================================================
// Categories
// ============================================================================

/// POST /api/categories
pub async fn create_category<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<CategoryRequest>,
) -> FinanceResult<impl IntoResponse>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = CategoryService::new(state.repo.clone());

    let category = service
        .create(
            &current.email,
            CategoryInput {
                name: req.name,
                kind: req.kind,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(CategoryResponse::from(category))))
}

/// GET /api/categories
pub async fn list_categories<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> FinanceResult<Json<Vec<CategoryResponse>>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = CategoryService::new(state.repo.clone());

    let categories = service.list(&current.email).await?;

    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

/// GET /api/categories/{id}
pub async fn get_category<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> FinanceResult<Json<CategoryResponse>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = CategoryService::new(state.repo.clone());

    let category = service
        .get(&current.email, &CategoryId::from_uuid(id))
        .await?;

    Ok(Json(CategoryResponse::from(category)))
}

/// PATCH /api/categories/{id}
pub async fn update_category<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<CategoryRequest>,
) -> FinanceResult<Json<CategoryResponse>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = CategoryService::new(state.repo.clone());

    let category = service
        .update(
            &current.email,
            &CategoryId::from_uuid(id),
            CategoryInput {
                name: req.name,
                kind: req.kind,
            },
        )
        .await?;

    Ok(Json(CategoryResponse::from(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete_category<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> FinanceResult<Json<Uuid>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = CategoryService::new(state.repo.clone());

    let deleted = service
        .delete(&current.email, &CategoryId::from_uuid(id))
        .await?;

    Ok(Json(deleted.into_uuid()))
}

// ============================================================================
// Transactions
// ============================================================================

/// POST /api/transactions
pub async fn create_transaction<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Json(req): Json<TransactionRequest>,
) -> FinanceResult<impl IntoResponse>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = TransactionService::new(state.repo.clone(), state.repo.clone());

    let transaction = service
        .create(
            &current.email,
            TransactionInput {
                category_id: req.category_id,
                amount: req.amount,
                date: req.date,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(TransactionResponse::from(transaction))))
}

/// GET /api/transactions
pub async fn list_transactions<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
) -> FinanceResult<Json<Vec<TransactionResponse>>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = TransactionService::new(state.repo.clone(), state.repo.clone());

    let transactions = service.list(&current.email).await?;

    Ok(Json(
        transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect(),
    ))
}

/// GET /api/transactions/{id}
pub async fn get_transaction<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> FinanceResult<Json<TransactionResponse>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = TransactionService::new(state.repo.clone(), state.repo.clone());

    let transaction = service
        .get(&current.email, &TransactionId::from_uuid(id))
        .await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// PATCH /api/transactions/{id}
pub async fn update_transaction<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<TransactionRequest>,
) -> FinanceResult<Json<TransactionResponse>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = TransactionService::new(state.repo.clone(), state.repo.clone());

    let transaction = service
        .update(
            &current.email,
            &TransactionId::from_uuid(id),
            TransactionInput {
                category_id: req.category_id,
                amount: req.amount,
                date: req.date,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(TransactionResponse::from(transaction)))
}

/// DELETE /api/transactions/{id}
pub async fn delete_transaction<R>(
    State(state): State<FinanceAppState<R>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> FinanceResult<Json<Uuid>>
where
    R: CategoryRepository + TransactionRepository + Clone + Send + Sync + 'static,
{
    let service = TransactionService::new(state.repo.clone(), state.repo.clone());

    let deleted = service
        .delete(&current.email, &TransactionId::from_uuid(id))
        .await?;

    Ok(Json(deleted.into_uuid()))
}
