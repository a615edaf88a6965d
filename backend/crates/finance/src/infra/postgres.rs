//! PostgreSQL Repository Implementations
//!
//! Ownership scoping is done in SQL: every statement joins `users` on the
//! owner's email, so a row owned by another user is simply never visible.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Category, Transaction};
use crate::domain::repository::{CategoryRepository, TransactionRepository};
use crate::domain::value_objects::{CategoryId, CategoryKind, TransactionId};
use crate::error::{FinanceError, FinanceResult};

/// PostgreSQL-backed finance repository
#[derive(Clone)]
pub struct PgFinanceRepository {
    pool: PgPool,
}

impl PgFinanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Category Repository Implementation
// ============================================================================

impl CategoryRepository for PgFinanceRepository {
    async fn create(&self, category: &Category) -> FinanceResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO categories (
                id,
                user_id,
                name,
                kind,
                is_default,
                created_at,
                updated_at
            )
            SELECT $1, u.user_id, $3, $4, $5, $6, $7
            FROM users u
            WHERE u.email = $2
            "#,
        )
        .bind(category.id.as_uuid())
        .bind(&category.owner_email)
        .bind(&category.name)
        .bind(category.kind.code())
        .bind(category.is_default)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(FinanceError::Internal(
                "Owner row missing for authenticated user".to_string(),
            ));
        }

        Ok(())
    }

    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
                c.id,
                u.email AS owner_email,
                c.name,
                c.kind,
                c.is_default,
                c.created_at,
                c.updated_at
            FROM categories c
            JOIN users u ON u.user_id = c.user_id
            WHERE u.email = $1
            ORDER BY c.kind ASC, c.created_at DESC
            "#,
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CategoryRow::into_category).collect()
    }

    async fn find_by_id_and_owner(
        &self,
        id: &CategoryId,
        owner_email: &str,
    ) -> FinanceResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT
                c.id,
                u.email AS owner_email,
                c.name,
                c.kind,
                c.is_default,
                c.created_at,
                c.updated_at
            FROM categories c
            JOIN users u ON u.user_id = c.user_id
            WHERE c.id = $1 AND u.email = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner_email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CategoryRow::into_category).transpose()
    }

    async fn update(&self, category: &Category) -> FinanceResult<()> {
        sqlx::query(
            r#"
            UPDATE categories c SET
                name = $3,
                kind = $4,
                updated_at = $5
            FROM users u
            WHERE c.id = $1
              AND c.user_id = u.user_id
              AND u.email = $2
            "#,
        )
        .bind(category.id.as_uuid())
        .bind(&category.owner_email)
        .bind(&category.name)
        .bind(category.kind.code())
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &CategoryId, owner_email: &str) -> FinanceResult<bool> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM categories c
            USING users u
            WHERE c.id = $1
              AND c.user_id = u.user_id
              AND u.email = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner_email)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }

    async fn exists_for_owner(&self, id: &Uuid, owner_email: &str) -> FinanceResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM categories c
                JOIN users u ON u.user_id = c.user_id
                WHERE c.id = $1 AND u.email = $2
            )
            "#,
        )
        .bind(id)
        .bind(owner_email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Transaction Repository Implementation
// ============================================================================

impl TransactionRepository for PgFinanceRepository {
    async fn create(&self, transaction: &Transaction) -> FinanceResult<()> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO transactions (
                id,
                user_id,
                category_id,
                amount,
                date,
                description,
                created_at,
                updated_at
            )
            SELECT $1, u.user_id, $3, $4, $5, $6, $7, $8
            FROM users u
            WHERE u.email = $2
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(&transaction.owner_email)
        .bind(transaction.category_id)
        .bind(transaction.amount)
        .bind(transaction.date)
        .bind(&transaction.description)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 0 {
            return Err(FinanceError::Internal(
                "Owner row missing for authenticated user".to_string(),
            ));
        }

        Ok(())
    }

    async fn find_by_owner(&self, owner_email: &str) -> FinanceResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                t.id,
                u.email AS owner_email,
                t.category_id,
                t.amount,
                t.date,
                t.description,
                t.created_at,
                t.updated_at
            FROM transactions t
            JOIN users u ON u.user_id = t.user_id
            WHERE u.email = $1
            ORDER BY t.date DESC, t.created_at DESC
            "#,
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TransactionRow::into_transaction).collect())
    }

    async fn find_by_id_and_owner(
        &self,
        id: &TransactionId,
        owner_email: &str,
    ) -> FinanceResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT
                t.id,
                u.email AS owner_email,
                t.category_id,
                t.amount,
                t.date,
                t.description,
                t.created_at,
                t.updated_at
            FROM transactions t
            JOIN users u ON u.user_id = t.user_id
            WHERE t.id = $1 AND u.email = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner_email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TransactionRow::into_transaction))
    }

    async fn update(&self, transaction: &Transaction) -> FinanceResult<()> {
        sqlx::query(
            r#"
            UPDATE transactions t SET
                category_id = $3,
                amount = $4,
                date = $5,
                description = $6,
                updated_at = $7
            FROM users u
            WHERE t.id = $1
              AND t.user_id = u.user_id
              AND u.email = $2
            "#,
        )
        .bind(transaction.id.as_uuid())
        .bind(&transaction.owner_email)
        .bind(transaction.category_id)
        .bind(transaction.amount)
        .bind(transaction.date)
        .bind(&transaction.description)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &TransactionId, owner_email: &str) -> FinanceResult<bool> {
        let deleted = sqlx::query(
            r#"
            DELETE FROM transactions t
            USING users u
            WHERE t.id = $1
              AND t.user_id = u.user_id
              AND u.email = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(owner_email)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    owner_email: String,
    name: String,
    kind: String,
    is_default: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CategoryRow {
    fn into_category(self) -> FinanceResult<Category> {
        let kind = CategoryKind::from_code(&self.kind).ok_or_else(|| {
            FinanceError::Internal(format!("Invalid category kind: {}", self.kind))
        })?;

        Ok(Category {
            id: CategoryId::from_uuid(self.id),
            owner_email: self.owner_email,
            name: self.name,
            kind,
            is_default: self.is_default,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    owner_email: String,
    category_id: Option<Uuid>,
    amount: f64,
    date: NaiveDate,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> Transaction {
        Transaction {
            id: TransactionId::from_uuid(self.id),
            owner_email: self.owner_email,
            category_id: self.category_id,
            amount: self.amount,
            date: self.date,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
