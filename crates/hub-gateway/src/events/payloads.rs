//! Payload bodies for Dispatch events

use serde::{Deserialize, Serialize};

/// Payload of an `ERROR_MESSAGE` event.
///
/// Sent only to the connection whose operation failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Human-readable failure reason
    pub reason: String,
}

impl ErrorPayload {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
