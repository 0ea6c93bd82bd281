//! Profile directory
//!
//! Resolves user ids to display data when materializing stored messages.

use dashmap::DashMap;
use hub_core::UserId;

/// Display data for one registered user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl UserProfile {
    /// Create a profile without an avatar
    pub fn new(id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            avatar_url: None,
        }
    }

    /// Set the avatar URL
    #[must_use]
    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }
}

/// In-memory registry of user profiles
///
/// Concurrent map keyed by user id; read by the message service on every
/// send, written when accounts are provisioned.
#[derive(Debug, Default)]
pub struct ProfileDirectory {
    profiles: DashMap<UserId, UserProfile>,
}

impl ProfileDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: DashMap::new(),
        }
    }

    /// Register or replace a profile
    pub fn register(&self, profile: UserProfile) {
        tracing::debug!(user_id = %profile.id, "Profile registered");
        self.profiles.insert(profile.id, profile);
    }

    /// Look up a profile by user id
    pub fn get(&self, id: UserId) -> Option<UserProfile> {
        self.profiles.get(&id).map(|p| p.clone())
    }

    /// Check whether a user is registered
    pub fn contains(&self, id: UserId) -> bool {
        self.profiles.contains_key(&id)
    }

    /// Number of registered profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
