//! The conversation session.
//!
//! [`ConversationSession`] owns all conversation state: the message list, the
//! draft buffer, and the friend's typing indicator. User intents append a
//! message right away and schedule a scripted reply on the session's
//! [`ReplyQueue`]. The owner drives time forward with
//! [`ConversationSession::poll`].
//!
//! Replies land in the order their delays expire, not in the order the
//! actions were taken, so a quick invite sent after a text message is
//! answered first.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigError, ReplyDelays};
use crate::message::{DeliveryStatus, ImageRef, Message, MessageId, MessageKind};
use crate::responses::{ResponseTable, IMAGE_CAPTION, IMAGE_REPLY, INVITE_ACCEPTED, INVITE_SENT};
use crate::schedule::ReplyQueue;
use crate::storage::{SessionStorage, StorageError};
use crate::user::User;

/// What the friend does when a scheduled reply comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScheduledReply {
    /// Answer a text message from the response table.
    Text,
    /// Answer a shared image.
    Image,
    /// Accept a game invite.
    InviteAccepted,
}

impl ScheduledReply {
    /// Whether this reply was announced by the typing indicator.
    fn shows_typing(self) -> bool {
        matches!(self, Self::Text | Self::Image)
    }
}

/// One chat session between the local user and the simulated friend.
#[derive(Debug)]
pub struct ConversationSession {
    local: User,
    friend: User,
    messages: Vec<Message>,
    draft: String,
    pending: ReplyQueue<ScheduledReply>,
    /// Text/image replies still pending; the friend is typing while non-zero.
    awaiting_replies: usize,
    next_id: u64,
    responses: ResponseTable,
    delays: ReplyDelays,
    rng: StdRng,
    storage: SessionStorage,
    torn_down: bool,
}

impl ConversationSession {
    /// Start a fresh session. No history is loaded.
    pub fn new(config: &Config) -> Result<Self, SessionError> {
        config.validate()?;
        let storage = match &config.storage_dir {
            Some(dir) => SessionStorage::at(dir)?,
            None => SessionStorage::temporary()?,
        };
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut friend = config.friend.clone();
        if friend.last_seen.is_none() {
            friend.last_seen = Some(Utc::now());
        }

        info!(
            local = %config.local_user.id,
            friend = %friend.id,
            storage = %storage.root().display(),
            "session started"
        );

        Ok(Self {
            local: config.local_user.clone(),
            friend,
            messages: Vec::new(),
            draft: String::new(),
            pending: ReplyQueue::new(),
            awaiting_replies: 0,
            next_id: 1,
            responses: config.response_table()?,
            delays: config.delays,
            rng,
            storage,
            torn_down: false,
        })
    }

    // === Props ===

    /// Messages in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn local_user(&self) -> &User {
        &self.local
    }

    pub fn friend(&self) -> &User {
        &self.friend
    }

    /// Whether the friend is composing a reply.
    pub fn is_typing(&self) -> bool {
        self.awaiting_replies > 0
    }

    /// Current compose buffer.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Whether `message` was sent by the local user.
    pub fn is_own(&self, message: &Message) -> bool {
        message.is_from(&self.local.id)
    }

    /// Number of scripted replies still scheduled.
    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    /// When the next scripted reply is due.
    pub fn next_reply_due(&self) -> Option<Instant> {
        self.pending.next_due()
    }

    /// The response pool text replies are drawn from.
    pub fn responses(&self) -> &ResponseTable {
        &self.responses
    }

    // === Intents ===

    /// Replace the compose buffer.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    /// Send the draft as a text message.
    ///
    /// A draft that is empty after trimming is ignored and left in place.
    pub fn submit_text(&mut self, now: Instant) -> Option<MessageId> {
        if self.torn_down || self.draft.trim().is_empty() {
            return None;
        }

        let text = std::mem::take(&mut self.draft);
        let id = self.next_message_id();
        let sender = self.local.id.clone();
        self.push(Message::text(id, sender, text, DeliveryStatus::Sent));
        self.schedule(now + self.delays.text(), ScheduledReply::Text);
        Some(id)
    }

    /// Share an image. `None` (nothing selected) is ignored.
    pub fn submit_image(&mut self, image: Option<ImageRef>, now: Instant) -> Option<MessageId> {
        let image = image?;
        if self.torn_down {
            return None;
        }

        let id = self.next_message_id();
        let sender = self.local.id.clone();
        self.push(Message::image(
            id,
            sender,
            IMAGE_CAPTION,
            image,
            DeliveryStatus::Sent,
        ));
        self.schedule(now + self.delays.image(), ScheduledReply::Image);
        Some(id)
    }

    /// Send a game invite. The friend always accepts.
    pub fn send_game_invite(&mut self, now: Instant) -> Option<MessageId> {
        if self.torn_down {
            return None;
        }

        let id = self.next_message_id();
        let sender = self.local.id.clone();
        self.push(Message::notification(id, sender, INVITE_SENT));
        self.schedule(now + self.delays.invite(), ScheduledReply::InviteAccepted);
        Some(id)
    }

    /// Copy a file into session storage so it can be shared.
    pub fn stage_image(&self, path: &Path) -> Result<ImageRef, StorageError> {
        self.storage.stage_image(path)
    }

    /// Apply every scripted reply due at or before `now`.
    ///
    /// Returns the ids of the appended replies, in the order they landed.
    pub fn poll(&mut self, now: Instant) -> Vec<MessageId> {
        let mut landed = Vec::new();
        while let Some((_, reply)) = self.pending.pop_due(now) {
            landed.push(self.deliver(reply));
        }
        landed
    }

    /// End the session: drop pending replies and clear scratch storage.
    ///
    /// Only the first call has an effect.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        let dropped = self.pending.clear();
        self.awaiting_replies = 0;
        match self.storage.clear() {
            Ok(removed) => info!(dropped, removed, "session torn down"),
            Err(e) => warn!(error = %e, "failed to clear session storage"),
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // === Internals ===

    fn next_message_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, message: Message) {
        debug!(
            id = %message.id,
            sender = %message.sender,
            kind = ?message.kind,
            "message appended"
        );
        self.messages.push(message);
    }

    fn schedule(&mut self, due: Instant, reply: ScheduledReply) {
        if reply.shows_typing() {
            self.awaiting_replies += 1;
        }
        self.pending.schedule(due, reply);
    }

    fn deliver(&mut self, reply: ScheduledReply) -> MessageId {
        if reply.shows_typing() {
            self.awaiting_replies = self.awaiting_replies.saturating_sub(1);
        }

        let id = self.next_message_id();
        let sender = self.friend.id.clone();
        let message = match reply {
            ScheduledReply::Text => {
                let text = self.responses.pick(&mut self.rng).to_string();
                Message::text(id, sender, text, DeliveryStatus::Read)
            }
            ScheduledReply::Image => Message::text(id, sender, IMAGE_REPLY, DeliveryStatus::Read),
            ScheduledReply::InviteAccepted => Message::notification(id, sender, INVITE_ACCEPTED),
        };
        self.push(message);
        id
    }
}

impl Drop for ConversationSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Errors that can occur when starting a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Invalid configuration.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Scratch storage could not be prepared.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn session() -> ConversationSession {
        let config = Config {
            seed: Some(7),
            ..Config::default()
        };
        ConversationSession::new(&config).unwrap()
    }

    fn staged_image(session: &ConversationSession, dir: &TempDir) -> ImageRef {
        let source = dir.path().join("beach.jpg");
        std::fs::write(&source, b"jpeg").unwrap();
        session.stage_image(&source).unwrap()
    }

    // ========================================================================
    // submit_text
    // ========================================================================

    #[test]
    fn test_submit_text_appends_sent_message_and_types() {
        let mut s = session();
        let t0 = Instant::now();
        s.set_draft("hi");

        let id = s.submit_text(t0).unwrap();

        assert_eq!(s.messages().len(), 1);
        let msg = &s.messages()[0];
        assert_eq!(msg.id, id);
        assert_eq!(msg.text, "hi");
        assert_eq!(msg.sender, s.local_user().id);
        assert_eq!(msg.kind, MessageKind::Text);
        assert_eq!(msg.status, Some(DeliveryStatus::Sent));
        assert_eq!(s.draft(), "");
        assert!(s.is_typing());
    }

    #[test]
    fn test_text_reply_after_two_seconds() {
        let mut s = session();
        let t0 = Instant::now();
        s.set_draft("hi");
        let sent = s.submit_text(t0).unwrap();

        assert!(s.poll(t0 + ms(1999)).is_empty());
        assert!(s.is_typing());
        assert_eq!(s.messages().len(), 1);

        let landed = s.poll(t0 + ms(2000));
        assert_eq!(landed.len(), 1);
        assert!(!s.is_typing());

        let reply = &s.messages()[1];
        assert_eq!(reply.sender, s.friend().id);
        assert_eq!(reply.status, Some(DeliveryStatus::Read));
        assert_eq!(reply.kind, MessageKind::Text);
        assert!(s.responses().contains(&reply.text));
        assert!(reply.id > sent);
    }

    #[test]
    fn test_blank_drafts_are_ignored() {
        let mut s = session();
        let t0 = Instant::now();

        for draft in ["", "   ", "\n\t "] {
            s.set_draft(draft);
            assert!(s.submit_text(t0).is_none());
            assert_eq!(s.draft(), draft);
        }

        assert!(s.messages().is_empty());
        assert!(!s.is_typing());
        assert_eq!(s.pending_replies(), 0);
    }

    #[test]
    fn test_draft_sent_verbatim() {
        let mut s = session();
        s.set_draft("  spaced out  ");
        s.submit_text(Instant::now()).unwrap();
        assert_eq!(s.messages()[0].text, "  spaced out  ");
    }

    // ========================================================================
    // submit_image
    // ========================================================================

    #[test]
    fn test_submit_image_none_is_noop() {
        let mut s = session();
        assert!(s.submit_image(None, Instant::now()).is_none());
        assert!(s.messages().is_empty());
        assert!(!s.is_typing());
    }

    #[test]
    fn test_submit_image_and_reply() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        let t0 = Instant::now();
        let image = staged_image(&s, &dir);

        s.submit_image(Some(image.clone()), t0).unwrap();

        let msg = &s.messages()[0];
        assert_eq!(msg.kind, MessageKind::Image);
        assert_eq!(msg.text, IMAGE_CAPTION);
        assert_eq!(msg.image.as_ref(), Some(&image));
        assert_eq!(msg.status, Some(DeliveryStatus::Sent));
        assert!(s.is_typing());

        assert!(s.poll(t0 + ms(2499)).is_empty());
        s.poll(t0 + ms(2500));

        let reply = &s.messages()[1];
        assert_eq!(reply.text, IMAGE_REPLY);
        assert_eq!(reply.kind, MessageKind::Text);
        assert_eq!(reply.status, Some(DeliveryStatus::Read));
        assert!(!s.is_typing());
    }

    // ========================================================================
    // send_game_invite
    // ========================================================================

    #[test]
    fn test_game_invite_round_trip() {
        let mut s = session();
        let t0 = Instant::now();

        s.send_game_invite(t0).unwrap();
        let invite = &s.messages()[0];
        assert_eq!(invite.kind, MessageKind::Notification);
        assert_eq!(invite.text, INVITE_SENT);
        assert!(invite.status.is_none());
        assert!(!s.is_typing());

        assert!(s.poll(t0 + ms(999)).is_empty());
        s.poll(t0 + ms(1000));

        let accepted = &s.messages()[1];
        assert_eq!(accepted.kind, MessageKind::Notification);
        assert_eq!(accepted.text, "🎮 Accepted game invite");
        assert_eq!(accepted.sender, s.friend().id);
        assert!(accepted.status.is_none());
        assert!(!s.is_typing());
    }

    #[test]
    fn test_invite_ignores_draft() {
        let mut s = session();
        s.set_draft("   ");
        s.send_game_invite(Instant::now()).unwrap();
        assert_eq!(s.messages().len(), 1);
        assert_eq!(s.draft(), "   ");
    }

    // ========================================================================
    // Ordering and typing
    // ========================================================================

    #[test]
    fn test_replies_follow_delay_expiry_not_submission() {
        let dir = TempDir::new().unwrap();
        let mut s = session();
        let t0 = Instant::now();
        let image = staged_image(&s, &dir);

        s.set_draft("first");
        let text = s.submit_text(t0).unwrap();
        let invite = s.send_game_invite(t0 + ms(100)).unwrap();
        let img = s.submit_image(Some(image), t0 + ms(200)).unwrap();

        s.poll(t0 + ms(1100));
        s.set_draft("second");
        let second = s.submit_text(t0 + ms(1500)).unwrap();
        s.poll(t0 + ms(10_000));

        let texts: Vec<&str> = s.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts[0], "first");
        assert_eq!(texts[1], INVITE_SENT);
        assert_eq!(texts[2], IMAGE_CAPTION);
        assert_eq!(texts[3], INVITE_ACCEPTED);
        assert_eq!(texts[4], "second");
        // text reply (t=2000) lands before image reply (t=2700)
        assert!(s.responses().contains(texts[5]));
        assert_eq!(texts[6], IMAGE_REPLY);
        assert!(s.responses().contains(texts[7]));

        // own messages keep submission order
        let own: Vec<MessageId> = s
            .messages()
            .iter()
            .filter(|m| s.is_own(m))
            .map(|m| m.id)
            .collect();
        assert_eq!(own, vec![text, invite, img, second]);
    }

    #[test]
    fn test_typing_stays_on_while_any_reply_pending() {
        let mut s = session();
        let t0 = Instant::now();

        s.set_draft("one");
        s.submit_text(t0);
        s.set_draft("two");
        s.submit_text(t0 + ms(500));

        s.poll(t0 + ms(2000));
        assert_eq!(s.messages().len(), 3);
        assert!(s.is_typing());

        s.poll(t0 + ms(2500));
        assert_eq!(s.messages().len(), 4);
        assert!(!s.is_typing());
    }

    #[test]
    fn test_every_sender_is_a_participant() {
        let mut s = session();
        let t0 = Instant::now();
        s.set_draft("hello");
        s.submit_text(t0);
        s.send_game_invite(t0);
        s.poll(t0 + ms(5000));

        let local = &s.local_user().id;
        let friend = &s.friend().id;
        assert!(s
            .messages()
            .iter()
            .all(|m| &m.sender == local || &m.sender == friend));
    }

    #[test]
    fn test_message_ids_strictly_increase() {
        let mut s = session();
        let t0 = Instant::now();
        for i in 0..5 {
            s.set_draft(format!("msg {i}"));
            s.submit_text(t0);
        }
        s.poll(t0 + ms(2000));

        let ids: Vec<u64> = s.messages().iter().map(|m| m.id.0).collect();
        assert_eq!(ids.len(), 10);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_seed_makes_replies_repeatable() {
        let run = || {
            let mut s = session();
            let t0 = Instant::now();
            for _ in 0..4 {
                s.set_draft("hey");
                s.submit_text(t0);
            }
            s.poll(t0 + ms(2000));
            s.messages()
                .iter()
                .filter(|m| !s.is_own(m))
                .map(|m| m.text.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_custom_delays() {
        let config = Config {
            delays: ReplyDelays {
                text_ms: 5,
                image_ms: 5,
                invite_ms: 5,
            },
            ..Config::default()
        };
        let mut s = ConversationSession::new(&config).unwrap();
        let t0 = Instant::now();
        s.set_draft("quick");
        s.submit_text(t0);
        assert_eq!(s.next_reply_due(), Some(t0 + ms(5)));
        assert_eq!(s.poll(t0 + ms(5)).len(), 1);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    #[test]
    fn test_friend_gets_last_seen_at_start() {
        let s = session();
        assert!(s.friend().last_seen.is_some());
        assert!(s.local_user().last_seen.is_none());
    }

    #[test]
    fn test_teardown_drops_pending_and_clears_storage() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("scratch");
        let config = Config {
            storage_dir: Some(scratch.clone()),
            ..Config::default()
        };
        let mut s = ConversationSession::new(&config).unwrap();
        let t0 = Instant::now();

        let image = staged_image(&s, &dir);
        assert!(image.path.exists());
        s.submit_image(Some(image.clone()), t0);

        s.teardown();
        assert!(s.is_torn_down());
        assert!(!s.is_typing());
        assert_eq!(s.pending_replies(), 0);
        assert!(!image.path.exists());
        assert!(s.poll(t0 + ms(10_000)).is_empty());
        assert_eq!(s.messages().len(), 1);

        // second call is a no-op
        s.teardown();
    }

    #[test]
    fn test_intents_ignored_after_teardown() {
        let mut s = session();
        s.teardown();
        s.set_draft("late");
        let t0 = Instant::now();
        assert!(s.submit_text(t0).is_none());
        assert!(s.send_game_invite(t0).is_none());
        assert!(s.messages().is_empty());
    }

    #[test]
    fn test_drop_clears_configured_storage() {
        let dir = TempDir::new().unwrap();
        let scratch = dir.path().join("scratch");
        let config = Config {
            storage_dir: Some(scratch.clone()),
            ..Config::default()
        };
        let s = ConversationSession::new(&config).unwrap();
        let image = staged_image(&s, &dir);
        drop(s);
        assert!(!image.path.exists());
    }

    #[test]
    fn test_teardown_keeps_unrelated_files_in_storage_dir() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"mine").unwrap();
        let config = Config {
            storage_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };

        let s = ConversationSession::new(&config).unwrap();
        let image = staged_image(&s, &dir);
        drop(s);

        assert!(!image.path.exists());
        assert_eq!(std::fs::read(&notes).unwrap(), b"mine");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            responses: Vec::new(),
            ..Config::default()
        };
        assert!(matches!(
            ConversationSession::new(&config),
            Err(SessionError::Config(ConfigError::EmptyResponses))
        ));
    }
}
