//! Authenticated caller context
//!
//! The identity established at connection-accept time, carried as an explicit
//! value rather than read from ambient state. Every chat operation takes this
//! as input, which keeps the handlers testable without a simulated transport.

use hub_core::UserId;

use crate::auth::Claims;
use crate::error::AppError;

/// Identity of an authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedContext {
    user_id: UserId,
}

impl AuthenticatedContext {
    /// Create a context for a known user id
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Derive a context from validated token claims
    ///
    /// # Errors
    /// Returns an error if the claims carry no usable subject
    pub fn from_claims(claims: &Claims) -> Result<Self, AppError> {
        Ok(Self {
            user_id: claims.user_id()?,
        })
    }

    /// The authenticated user id
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}
