//! Domain Entities
//!
//! Plain data-access entities. Ownership is carried as the owner's email
//! and enforced by the repository queries; there are no other invariants
//! in this context.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::value_objects::{CategoryId, CategoryKind, TransactionId};

/// Spending/income category owned by a user
#[derive(Debug, Clone)]
pub struct Category {
    pub id: CategoryId,
    /// Owner's email (unique user key at the API boundary)
    pub owner_email: String,
    pub name: String,
    pub kind: CategoryKind,
    /// Seeded default categories cannot be created through the API
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new user-defined category (never a default one)
    pub fn new(owner_email: String, name: String, kind: CategoryKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            owner_email,
            name,
            kind,
            is_default: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename and/or re-kind; owner and default flag are immutable
    pub fn apply_update(&mut self, name: String, kind: CategoryKind) {
        self.name = name;
        self.kind = kind;
        self.updated_at = Utc::now();
    }
}

/// A single money movement owned by a user
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: TransactionId,
    /// Owner's email
    pub owner_email: String,
    /// Optional category; must belong to the same owner
    pub category_id: Option<Uuid>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        owner_email: String,
        category_id: Option<Uuid>,
        amount: f64,
        date: NaiveDate,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            owner_email,
            category_id,
            amount,
            date,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(
        &mut self,
        category_id: Option<Uuid>,
        amount: f64,
        date: NaiveDate,
        description: Option<String>,
    ) {
        self.category_id = category_id;
        self.amount = amount;
        self.date = date;
        self.description = description;
        self.updated_at = Utc::now();
    }
}
