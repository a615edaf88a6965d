//! Activation Code Value Object
//!
//! Short numeric code proving receipt of an activation email.

use serde::{Deserialize, Serialize};

/// Short random numeric activation code
///
/// Generation gives no uniqueness guarantee; the ledger stores whatever
/// was generated and lookups are by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivationCode(String);

impl ActivationCode {
    /// Generate a fresh code of exactly `length` decimal digits
    pub fn generate(length: usize) -> Self {
        Self(platform::crypto::random_digits(length))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ActivationCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_digits() {
        let code = ActivationCode::generate(6);
        assert_eq!(code.as_str().len(), 6);
        assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_independent() {
        // Two 6-digit codes may legitimately collide (1 in 10^6),
        // so compare a batch instead of a single pair.
        let codes: Vec<ActivationCode> =
            (0..8).map(|_| ActivationCode::generate(6)).collect();
        let distinct: std::collections::HashSet<&str> =
            codes.iter().map(|c| c.as_str()).collect();
        assert!(distinct.len() > 1);
    }
}
