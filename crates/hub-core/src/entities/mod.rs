//! Domain entities

mod draft;
mod message;

pub use draft::{AttachmentUpload, MessageDraft};
pub use message::{MediaItem, MediaKind, MessageView, ReactionView};
