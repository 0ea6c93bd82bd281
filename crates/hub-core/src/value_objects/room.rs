//! Room identifier - the runtime fan-out label for one conversation
//!
//! A room has no persisted representation; it only names the set of live
//! connections observing a conversation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a fan-out room
///
/// Non-empty by construction; built from whatever conversation key the client
/// uses (direct conversation id, group id, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomId(String);

impl RoomId {
    /// Create a room id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self, RoomIdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RoomIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Get the room id as a string slice
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Error when constructing a `RoomId`
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoomIdError {
    #[error("room id must not be empty")]
    Empty,
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RoomId {
    type Error = RoomIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RoomId> for String {
    fn from(room: RoomId) -> Self {
        room.0
    }
}

impl std::str::FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
