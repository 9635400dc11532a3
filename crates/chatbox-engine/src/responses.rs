//! Canned texts for the simulated friend.

use rand::Rng;

/// Default pool of friend replies to text messages.
pub const FRIEND_RESPONSES: &[&str] = &[
    "Haha that's awesome! 😂",
    "No way! Tell me more 👀",
    "Omg same 🙌",
    "That's so cool! ✨",
    "lol you're the best 💯",
    "Wait what?? 😮",
    "Sounds like a plan! 🎉",
    "I was just thinking about that 🤔",
    "Brb, grabbing snacks 🍕",
    "You always know what to say 😊",
];

/// Caption attached to a shared image.
pub const IMAGE_CAPTION: &str = "📸 Shared a photo";

/// Friend reply to a shared image.
pub const IMAGE_REPLY: &str = "Nice pic! 📸";

/// Notification sent with a game invite.
pub const INVITE_SENT: &str = "🎮 Sent a game invite";

/// Friend notification accepting a game invite.
pub const INVITE_ACCEPTED: &str = "🎮 Accepted game invite";

/// A non-empty table of reply texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    entries: Vec<String>,
}

impl ResponseTable {
    /// Build a table, returning `None` if it would be empty.
    pub fn new(entries: Vec<String>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// Pick one entry uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.random_range(0..self.entries.len());
        &self.entries[index]
    }

    /// Check whether `text` is in the table.
    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|e| e == text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ResponseTable {
    fn default() -> Self {
        Self {
            entries: FRIEND_RESPONSES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}
