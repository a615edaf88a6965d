//! Repository Traits
//!
//! Every read and write is scoped by the owner's email; a row owned by
//! someone else behaves exactly like a missing row.

use uuid::Uuid;

use crate::domain::entities::{Category, Transaction};
use crate::domain::value_objects::{CategoryId, TransactionId};
use crate::error::FinanceResult;

/// Category repository trait
#[trait_variant::make(CategoryRepository: Send)]
pub trait LocalCategoryRepository {
    /// Persist a new category
    async fn create(&self, category: &Category) -> FinanceResult<()>;

    /// All categories of one owner, income first, newest first within kind
    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Category>>;

    /// One category, only if owned
    async fn find_by_id_and_owner(
        &self,
        id: &CategoryId,
        owner_email: &str,
    ) -> FinanceResult<Option<Category>>;

    /// Update name/kind
    async fn update(&self, category: &Category) -> FinanceResult<()>;

    /// Delete, only if owned; returns whether a row was removed
    async fn delete(&self, id: &CategoryId, owner_email: &str) -> FinanceResult<bool>;

    /// Check that a category id exists and is owned
    async fn exists_for_owner(&self, id: &Uuid, owner_email: &str) -> FinanceResult<bool>;
}

/// Transaction repository trait
#[trait_variant::make(TransactionRepository: Send)]
pub trait LocalTransactionRepository {
    /// Persist a new transaction
    async fn create(&self, transaction: &Transaction) -> FinanceResult<()>;

    /// All transactions of one owner, most recent date first
    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Transaction>>;

    /// One transaction, only if owned
    async fn find_by_id_and_owner(
        &self,
        id: &TransactionId,
        owner_email: &str,
    ) -> FinanceResult<Option<Transaction>>;

    /// Update amount/date/description/category
    async fn update(&self, transaction: &Transaction) -> FinanceResult<()>;

    /// Delete, only if owned; returns whether a row was removed
    async fn delete(&self, id: &TransactionId, owner_email: &str) -> FinanceResult<bool>;
}
