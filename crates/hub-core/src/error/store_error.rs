//! Message store error taxonomy
//!
//! A send either persists and returns a view, or fails with one of these.
//! Both variants carry a human-readable reason that is surfaced verbatim to
//! the caller; the "unexpected" category lives with the session handler, not
//! here.

use thiserror::Error;

/// Failure reported by a message store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Business-rule rejection (invalid recipient, empty content, ...)
    #[error("{0}")]
    Rejected(String),

    /// The store itself failed to record the message
    #[error("storage failure: {0}")]
    Storage(String),
}

impl StoreError {
    /// Create a business-rule rejection
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Create a storage failure
    pub fn storage(reason: impl Into<String>) -> Self {
        Self::Storage(reason.into())
    }

    /// Whether this is a business-rule rejection
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result type for message store operations
pub type StoreResult<T> = Result<T, StoreError>;
