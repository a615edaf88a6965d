//! Transaction Service
//!
//! CRUD over a user's transactions. A transaction may only reference a
//! category owned by the same user.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::Transaction;
use crate::domain::repository::{CategoryRepository, TransactionRepository};
use crate::domain::value_objects::TransactionId;
use crate::error::{FinanceError, FinanceResult};

/// Transaction create/update payload
pub struct TransactionInput {
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl TransactionInput {
    fn validated(self) -> FinanceResult<Self> {
        if !self.amount.is_finite() {
            return Err(FinanceError::Validation("Amount must be a number".to_string()));
        }
        Ok(self)
    }
}

/// Transaction application service
pub struct TransactionService<T, C>
where
    T: TransactionRepository,
    C: CategoryRepository,
{
    transaction_repo: Arc<T>,
    category_repo: Arc<C>,
}

impl<T, C> TransactionService<T, C>
where
    T: TransactionRepository,
    C: CategoryRepository,
{
    pub fn new(transaction_repo: Arc<T>, category_repo: Arc<C>) -> Self {
        Self {
            transaction_repo,
            category_repo,
        }
    }

    /// Reject category ids that do not exist or belong to someone else
    async fn check_category(
        &self,
        owner_email: &str,
        category_id: &Option<Uuid>,
    ) -> FinanceResult<()> {
        if let Some(id) = category_id {
            if !self.category_repo.exists_for_owner(id, owner_email).await? {
                return Err(FinanceError::CategoryNotFound);
            }
        }
        Ok(())
    }

    pub async fn create(
        &self,
        owner_email: &str,
        input: TransactionInput,
    ) -> FinanceResult<Transaction> {
        let input = input.validated()?;
        self.check_category(owner_email, &input.category_id).await?;

        let transaction = Transaction::new(
            owner_email.to_string(),
            input.category_id,
            input.amount,
            input.date,
            input.description,
        );
        self.transaction_repo.create(&transaction).await?;

        tracing::info!(
            owner = owner_email,
            transaction_id = %transaction.id,
            "Transaction created"
        );

        Ok(transaction)
    }

    pub async fn list(&self, owner_email: &str) -> FinanceResult<Vec<Transaction>> {
        self.transaction_repo.find_by_owner(owner_email).await
    }

    pub async fn get(
        &self,
        owner_email: &str,
        id: &TransactionId,
    ) -> FinanceResult<Transaction> {
        self.transaction_repo
            .find_by_id_and_owner(id, owner_email)
            .await?
            .ok_or(FinanceError::TransactionNotFound)
    }

    pub async fn update(
        &self,
        owner_email: &str,
        id: &TransactionId,
        input: TransactionInput,
    ) -> FinanceResult<Transaction> {
        let input = input.validated()?;
        self.check_category(owner_email, &input.category_id).await?;

        let mut transaction = self.get(owner_email, id).await?;
        transaction.apply_update(
            input.category_id,
            input.amount,
            input.date,
            input.description,
        );
        self.transaction_repo.update(&transaction).await?;

        Ok(transaction)
    }

    pub async fn delete(
        &self,
        owner_email: &str,
        id: &TransactionId,
    ) -> FinanceResult<TransactionId> {
        if !self.transaction_repo.delete(id, owner_email).await? {
            return Err(FinanceError::TransactionNotFound);
        }

        tracing::info!(owner = owner_email, transaction_id = %id, "Transaction deleted");

        Ok(*id)
    }
}
