//! Role Entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Name of the canonical role granted to every registered user.
/// The row itself is seeded once at startup, before traffic is accepted.
pub const DEFAULT_ROLE: &str = "USER";

/// Named role granted to users
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}
