//! Participant identities.
//!
//! A session has exactly two users: the local user typing at the terminal and
//! the simulated friend whose replies are scripted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A chat participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id within the session.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Free-form status line (e.g. "🎮 Playing games").
    pub status: String,
    /// When the user was last seen, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

impl User {
    /// Create a user without a last-seen time.
    pub fn new(id: impl Into<String>, name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            status: status.into(),
            last_seen: None,
        }
    }

    /// Set the last-seen time.
    #[must_use]
    pub fn seen_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_seen = Some(at);
        self
    }

    /// The default local user.
    pub fn local() -> Self {
        Self::new("user1", "You", "✨ Active now")
    }

    /// The default simulated friend.
    pub fn friend() -> Self {
        Self::new("user2", "Best Friend", "🎮 Playing games")
    }
}
