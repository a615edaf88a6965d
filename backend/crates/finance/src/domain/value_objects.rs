//! Domain Value Objects

use serde::{Deserialize, Serialize};
use std::fmt;

// Typed IDs come from the shared kernel
pub use kernel::id::{CategoryId, TransactionId};

/// Category kind: money in or money out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    /// Get string code for database storage and API payloads
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Create from string code
    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
