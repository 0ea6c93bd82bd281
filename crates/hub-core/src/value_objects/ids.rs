//! UUID-backed identifier newtypes
//!
//! Users, groups, and messages are identified by UUIDs. Each gets its own
//! newtype so an id of one kind cannot be passed where another is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing UUID
            #[inline]
            pub const fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random identifier
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the inner UUID
            #[inline]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<Uuid>().map(Self)
            }
        }
    };
}

uuid_id! {
    /// Identifier of an authenticated user profile
    UserId
}

uuid_id! {
    /// Identifier of a chat group (group conversations)
    GroupId
}

uuid_id! {
    /// Identifier of a durably stored message
    MessageId
}

uuid_id! {
    /// Identifier of a stored media item
    MediaId
}
