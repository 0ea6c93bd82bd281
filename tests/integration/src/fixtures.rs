//! Test fixtures

use hub_core::UserId;
use hub_service::{ProfileDirectory, UserProfile};

/// Known users seeded into every test gateway
pub struct SeededUsers {
    pub alice: UserId,
    pub bob: UserId,
    pub carol: UserId,
}

/// Register the standard test users in a profile directory
pub fn seed_profiles(profiles: &ProfileDirectory) -> SeededUsers {
    let alice = UserId::generate();
    let bob = UserId::generate();
    let carol = UserId::generate();

    profiles.register(UserProfile::new(alice, "alice").with_avatar("/avatars/alice.png"));
    profiles.register(UserProfile::new(bob, "bob"));
    profiles.register(UserProfile::new(carol, "carol"));

    SeededUsers { alice, bob, carol }
}
