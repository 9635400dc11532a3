//! chatbox-engine: Conversation state for the chatbox mock chat
//!
//! This crate provides the headless core of chatbox, including:
//! - Users and messages
//! - The conversation session and its scripted friend
//! - A single-threaded reply queue
//! - Configuration and session scratch storage

pub mod config;
pub mod message;
pub mod responses;
pub mod schedule;
pub mod session;
pub mod storage;
pub mod user;

// Re-export commonly used types
pub use config::{Config, ConfigError, ReplyDelays};
pub use message::{DeliveryStatus, ImageRef, Message, MessageId, MessageKind};
pub use responses::ResponseTable;
pub use schedule::{ReplyQueue, TaskId};
pub use session::{ConversationSession, SessionError};
pub use storage::{SessionStorage, StorageError};
pub use user::{User, UserId};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
