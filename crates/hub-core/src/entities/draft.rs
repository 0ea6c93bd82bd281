//! Outgoing message draft
//!
//! Transient input to the message store; nothing here is persisted as-is.

use serde::{Deserialize, Serialize};

use crate::entities::MediaKind;
use crate::value_objects::{GroupId, UserId};

/// Describes one piece of media to attach to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentUpload {
    pub file_path: String,
    pub file_name: String,
    pub kind: MediaKind,
}

/// A message as submitted by a sender, before persistence
///
/// Exactly one of `receiver_id` (direct message) or `group_id` (group
/// conversation) identifies the destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    /// Ordered attachment uploads; order is preserved in the stored message
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>,
}

impl MessageDraft {
    /// Create a plain text draft for a direct message
    pub fn direct(content: impl Into<String>, receiver_id: UserId) -> Self {
        Self {
            content: content.into(),
            receiver_id: Some(receiver_id),
            group_id: None,
            attachments: Vec::new(),
        }
    }

    /// Create a plain text draft for a group conversation
    pub fn group(content: impl Into<String>, group_id: GroupId) -> Self {
        Self {
            content: content.into(),
            receiver_id: None,
            group_id: Some(group_id),
            attachments: Vec::new(),
        }
    }

    /// Add attachment uploads, preserving their order
    #[must_use]
    pub fn with_attachments(mut self, attachments: Vec<AttachmentUpload>) -> Self {
        self.attachments = attachments;
        self
    }
}
