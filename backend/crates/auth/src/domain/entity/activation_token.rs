//! Activation Token Entity
//!
//! One-time, time-bounded code record binding an emailed activation code
//! to the user it was issued for.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::{activation_code::ActivationCode, user_id::UserId};

/// Activation token entity
///
/// A user may accumulate several tokens over time (resend on expiry);
/// only the most recently issued unconsumed one is meaningful.
#[derive(Debug, Clone)]
pub struct ActivationToken {
    pub id: Uuid,
    /// The emailed numeric code
    pub code: ActivationCode,
    /// Owner of the token
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    /// created_at + configured TTL
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, on consumption; a consumed token is never
    /// accepted again
    pub validated_at: Option<DateTime<Utc>>,
}

impl ActivationToken {
    /// Create a fresh token for `user_id`, expiring after `ttl`
    pub fn new(user_id: UserId, code: ActivationCode, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            code,
            user_id,
            created_at: now,
            expires_at: now + ttl,
            validated_at: None,
        }
    }

    /// Check if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Check if the token was already used
    pub fn is_consumed(&self) -> bool {
        self.validated_at.is_some()
    }

    /// Mark the token as used
    pub fn consume(&mut self) {
        self.validated_at = Some(Utc::now());
    }
}
