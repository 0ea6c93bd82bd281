//! Stored message representation
//!
//! `MessageView` is the display-ready form of a durably stored message, as
//! returned by the message store and consumed verbatim by the realtime
//! fan-out. The hub never mutates a view after the store produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{MediaId, MessageId, UserId};

/// Kind of media attached to a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

/// One stored media item, ordered within its message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    pub url: String,
    pub file_name: String,
    pub kind: MediaKind,
    /// Position within the message's attachment list (0-based)
    pub position: u32,
}

/// Reaction summary attached to a message
///
/// Opaque to the realtime hub; carried through unchanged.
pub type ReactionView = serde_json::Value;

/// Fully populated, display-ready form of a stored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: MessageId,
    pub content: String,
    pub sender_id: UserId,
    pub sender_display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_avatar: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub is_edited: bool,
    /// Ordered by `MediaItem::position`
    #[serde(default)]
    pub media: Vec<MediaItem>,
    #[serde(default)]
    pub reactions: Vec<ReactionView>,
}

impl MessageView {
    /// Create a view for a freshly stored text message
    pub fn new(
        id: MessageId,
        content: String,
        sender_id: UserId,
        sender_display_name: String,
    ) -> Self {
        Self {
            id,
            content,
            sender_id,
            sender_display_name,
            sender_avatar: None,
            sent_at: Utc::now(),
            is_edited: false,
            media: Vec::new(),
            reactions: Vec::new(),
        }
    }

    /// Attach the sender's avatar
    #[must_use]
    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.sender_avatar = Some(avatar.into());
        self
    }

    /// Attach stored media items (must already be in position order)
    #[must_use]
    pub fn with_media(mut self, media: Vec<MediaItem>) -> Self {
        self.media = media;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_view() -> MessageView {
        MessageView::new(
            MessageId::generate(),
            "hello".to_string(),
            UserId::generate(),
            "alice".to_string(),
        )
    }

    #[test]
    fn test_new_view_defaults() {
        let view = sample_view();
        assert_eq!(view.content, "hello");
        assert!(!view.is_edited);
        assert!(view.sender_avatar.is_none());
        assert!(view.media.is_empty());
        assert!(view.reactions.is_empty());
    }

    #[test]
    fn test_with_avatar_and_media() {
        let view = sample_view().with_avatar("/avatars/alice.png").with_media(vec![MediaItem {
            id: MediaId::generate(),
            url: "/media/photo.jpg".to_string(),
            file_name: "photo.jpg".to_string(),
            kind: MediaKind::Image,
            position: 0,
        }]);

        assert_eq!(view.sender_avatar.as_deref(), Some("/avatars/alice.png"));
        assert_eq!(view.media.len(), 1);
        assert_eq!(view.media[0].kind, MediaKind::Image);
    }

    #[test]
    fn test_view_serde_roundtrip() {
        let view = sample_view();
        let json = serde_json::to_string(&view).unwrap();
        let back: MessageView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, view);
    }

    #[test]
    fn test_media_kind_wire_names() {
        assert_eq!(serde_json::to_string(&MediaKind::Image).unwrap(), "\"image\"");
        assert_eq!(serde_json::to_string(&MediaKind::File).unwrap(), "\"file\"");
    }
}
