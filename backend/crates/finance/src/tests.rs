//! Service tests against an in-memory repository
//!
//! Exercise ownership scoping and the category-ownership rule without a
//! database.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::application::{
    CategoryInput, CategoryService, TransactionInput, TransactionService,
};
use crate::domain::entities::{Category, Transaction};
use crate::domain::repository::{CategoryRepository, TransactionRepository};
use crate::domain::value_objects::{CategoryId, CategoryKind, TransactionId};
use crate::error::{FinanceError, FinanceResult};

// ============================================================================
// In-memory fake
// ============================================================================

#[derive(Clone, Default)]
struct MemStore {
    categories: Arc<Mutex<Vec<Category>>>,
    transactions: Arc<Mutex<Vec<Transaction>>>,
}

impl CategoryRepository for MemStore {
    async fn create(&self, category: &Category) -> FinanceResult<()> {
        self.categories.lock().unwrap().push(category.clone());
        Ok(())
    }

    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.owner_email == owner_email)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &CategoryId,
        owner_email: &str,
    ) -> FinanceResult<Option<Category>> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == *id && c.owner_email == owner_email)
            .cloned())
    }

    async fn update(&self, category: &Category) -> FinanceResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if let Some(stored) = categories.iter_mut().find(|c| c.id == category.id) {
            *stored = category.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &CategoryId, owner_email: &str) -> FinanceResult<bool> {
        let mut categories = self.categories.lock().unwrap();
        let before = categories.len();
        categories.retain(|c| !(c.id == *id && c.owner_email == owner_email));
        Ok(categories.len() < before)
    }

    async fn exists_for_owner(&self, id: &Uuid, owner_email: &str) -> FinanceResult<bool> {
        Ok(self
            .categories
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.id.as_uuid() == id && c.owner_email == owner_email))
    }
}

impl TransactionRepository for MemStore {
    async fn create(&self, transaction: &Transaction) -> FinanceResult<()> {
        self.transactions.lock().unwrap().push(transaction.clone());
        Ok(())
    }

    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.owner_email == owner_email)
            .cloned()
            .collect())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &TransactionId,
        owner_email: &str,
    ) -> FinanceResult<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == *id && t.owner_email == owner_email)
            .cloned())
    }

    async fn update(&self, transaction: &Transaction) -> FinanceResult<()> {
        let mut transactions = self.transactions.lock().unwrap();
        if let Some(stored) = transactions.iter_mut().find(|t| t.id == transaction.id) {
            *stored = transaction.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &TransactionId, owner_email: &str) -> FinanceResult<bool> {
        let mut transactions = self.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|t| !(t.id == *id && t.owner_email == owner_email));
        Ok(transactions.len() < before)
    }
}

fn category_service(store: &MemStore) -> CategoryService<MemStore> {
    CategoryService::new(Arc::new(store.clone()))
}

fn transaction_service(store: &MemStore) -> TransactionService<MemStore, MemStore> {
    TransactionService::new(Arc::new(store.clone()), Arc::new(store.clone()))
}

fn groceries() -> CategoryInput {
    CategoryInput {
        name: "Groceries".to_string(),
        kind: CategoryKind::Expense,
    }
}

fn lunch(category_id: Option<Uuid>) -> TransactionInput {
    TransactionInput {
        category_id,
        amount: 12.5,
        date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        description: Some("Lunch".to_string()),
    }
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
async fn category_crud_is_owner_scoped() {
    let store = MemStore::default();
    let service = category_service(&store);

    let created = service.create("ana@x.com", groceries()).await.unwrap();
    assert!(!created.is_default);

    // Owner sees it, someone else does not
    assert_eq!(service.list("ana@x.com").await.unwrap().len(), 1);
    assert!(service.list("bob@x.com").await.unwrap().is_empty());

    let err = service.get("bob@x.com", &created.id).await.unwrap_err();
    assert!(matches!(err, FinanceError::CategoryNotFound));

    let err = service.delete("bob@x.com", &created.id).await.unwrap_err();
    assert!(matches!(err, FinanceError::CategoryNotFound));

    // Owner can update and delete
    let updated = service
        .update(
            "ana@x.com",
            &created.id,
            CategoryInput {
                name: "Food".to_string(),
                kind: CategoryKind::Expense,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Food");

    service.delete("ana@x.com", &created.id).await.unwrap();
    assert!(service.list("ana@x.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn category_name_is_mandatory() {
    let store = MemStore::default();
    let service = category_service(&store);

    let err = service
        .create(
            "ana@x.com",
            CategoryInput {
                name: "   ".to_string(),
                kind: CategoryKind::Income,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
}

// ============================================================================
// Transactions
// ============================================================================

#[tokio::test]
async fn transaction_rejects_foreign_category() {
    let store = MemStore::default();
    let categories = category_service(&store);
    let transactions = transaction_service(&store);

    let bobs_category = categories.create("bob@x.com", groceries()).await.unwrap();

    let err = transactions
        .create("ana@x.com", lunch(Some(bobs_category.id.into_uuid())))
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::CategoryNotFound));
}

#[tokio::test]
async fn transaction_crud_roundtrip() {
    let store = MemStore::default();
    let categories = category_service(&store);
    let transactions = transaction_service(&store);

    let category = categories.create("ana@x.com", groceries()).await.unwrap();

    let created = transactions
        .create("ana@x.com", lunch(Some(category.id.into_uuid())))
        .await
        .unwrap();
    assert_eq!(created.amount, 12.5);

    // Not visible to another user
    assert!(transactions.list("bob@x.com").await.unwrap().is_empty());

    let updated = transactions
        .update(
            "ana@x.com",
            &created.id,
            TransactionInput {
                category_id: None,
                amount: 20.0,
                date: created.date,
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, 20.0);
    assert!(updated.category_id.is_none());

    transactions.delete("ana@x.com", &created.id).await.unwrap();
    assert!(transactions.list("ana@x.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn transaction_rejects_non_finite_amount() {
    let store = MemStore::default();
    let service = transaction_service(&store);

    let err = service
        .create(
            "ana@x.com",
            TransactionInput {
                category_id: None,
                amount: f64::NAN,
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                description: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, FinanceError::Validation(_)));
}
