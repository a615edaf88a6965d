//! API DTOs (Data Transfer Objects)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Category, Transaction};
use crate::domain::value_objects::CategoryKind;

// ============================================================================
// Categories
// ============================================================================

/// Category create/update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    pub name: String,
    pub kind: CategoryKind,
}

/// Category response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into_uuid(),
            name: category.name,
            kind: category.kind,
        }
    }
}

// ============================================================================
// Transactions
// ============================================================================

/// Transaction create/update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

/// Transaction response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl From<Transaction> for TransactionResponse {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id.into_uuid(),
            category_id: transaction.category_id,
            amount: transaction.amount,
            date: transaction.date,
            description: transaction.description,
        }
    }
}
