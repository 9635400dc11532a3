//! Conversation messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::user::UserId;

/// Per-session message identifier.
///
/// Ids increase monotonically in creation order, so a reply always has a
/// larger id than the message that triggered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a message is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text.
    Text,
    /// Shared image with a caption.
    Image,
    /// System-style notice (game invites).
    Notification,
}

/// Cosmetic delivery label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Read,
}

impl std::fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sent => write!(f, "sent"),
            Self::Read => write!(f, "read"),
        }
    }
}

/// Opaque handle to an image staged in session scratch storage.
///
/// Only valid for the lifetime of the session that staged it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Handle id.
    pub id: Uuid,
    /// Original file name, for display.
    pub file_name: String,
    /// Location of the staged copy.
    pub path: PathBuf,
    /// Size in bytes.
    pub bytes: u64,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    pub sender: UserId,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
    /// Notifications carry no status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeliveryStatus>,
}

impl Message {
    /// Create a text message.
    pub fn text(
        id: MessageId,
        sender: UserId,
        text: impl Into<String>,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            image: None,
            sender,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
            status: Some(status),
        }
    }

    /// Create an image message with a caption.
    pub fn image(
        id: MessageId,
        sender: UserId,
        caption: impl Into<String>,
        image: ImageRef,
        status: DeliveryStatus,
    ) -> Self {
        Self {
            id,
            text: caption.into(),
            image: Some(image),
            sender,
            timestamp: Utc::now(),
            kind: MessageKind::Image,
            status: Some(status),
        }
    }

    /// Create a notification.
    pub fn notification(id: MessageId, sender: UserId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            image: None,
            sender,
            timestamp: Utc::now(),
            kind: MessageKind::Notification,
            status: None,
        }
    }

    /// Whether this message was sent by `user`.
    pub fn is_from(&self, user: &UserId) -> bool {
        &self.sender == user
    }
}
