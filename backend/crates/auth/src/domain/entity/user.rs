//! User Entity

use chrono::{DateTime, Utc};

use crate::domain::entity::role::Role;
use crate::domain::value_object::{
    email::Email, user_id::UserId, user_password::UserPassword,
};

/// User account entity
///
/// A freshly registered user is disabled until the activation flow
/// flips `enabled`; `locked` is an administrative flag this core only
/// reads.
#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    pub firstname: String,
    pub lastname: String,
    /// Email address (globally unique, lowercased)
    pub email: Email,
    /// Hashed password
    pub password_hash: UserPassword,
    /// Whether the account has been activated
    pub enabled: bool,
    /// Whether the account is administratively locked
    pub locked: bool,
    /// Granted roles
    pub roles: Vec<Role>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, disabled user with a single role
    pub fn new(
        firstname: String,
        lastname: String,
        email: Email,
        password_hash: UserPassword,
        role: Role,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            firstname,
            lastname,
            email,
            password_hash,
            enabled: false,
            locked: false,
            roles: vec![role],
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name used in token claims and mail greetings
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// Mark the account as activated
    pub fn enable(&mut self) {
        self.enabled = true;
        self.updated_at = Utc::now();
    }
}
