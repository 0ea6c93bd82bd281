//! # hub-core
//!
//! Domain layer containing identifier value objects, message entities, and the
//! message store contract. This crate has zero dependencies on infrastructure
//! (web framework, transport, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AttachmentUpload, MediaItem, MediaKind, MessageDraft, MessageView, ReactionView,
};
pub use error::{StoreError, StoreResult};
pub use traits::MessageStore;
pub use value_objects::{GroupId, MediaId, MessageId, RoomId, RoomIdError, UserId};
