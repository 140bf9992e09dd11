//! Conversation session core — append-only message log plus the
//! single in-flight-reply flag, and the registry that owns live sessions.
//!
//! Lifecycle rules:
//! - a session is created with exactly one seeded assistant greeting;
//! - the log is append-only and insertion-ordered; messages are never
//!   mutated or deleted;
//! - at most one send cycle may be outstanding: appending a user message
//!   while `awaiting_reply` is set is rejected with `SessionError::Busy`;
//! - sessions are in-memory only and vanish when discarded.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

use crate::config::MAX_MESSAGE_LEN;
use crate::models::{ChatMessage, MessageSender};

/// Greeting seeded into every new session.
pub const GREETING: &str = "Hello! I'm MedicalGPT, your AI-powered medical assistant. \
I can help analyze your symptoms, review medical documents or images, and recommend \
appropriate specialists. How can I assist you today?";

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Message cannot be empty")]
    EmptyMessage,
    #[error("Message too long (max {max} chars)")]
    MessageTooLong { max: usize },
    #[error("A reply is already pending for this session")]
    Busy,
    #[error("Internal lock error")]
    LockPoisoned,
}

// ═══════════════════════════════════════════════════════════
// ConversationSession
// ═══════════════════════════════════════════════════════════

/// The ordered message log and pending-reply flag for one chat session.
#[derive(Debug)]
pub struct ConversationSession {
    messages: Vec<ChatMessage>,
    awaiting_reply: bool,
}

impl ConversationSession {
    /// Create a session seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(MessageSender::Assistant, GREETING)],
            awaiting_reply: false,
        }
    }

    /// Append a user message and mark the session as awaiting a reply.
    ///
    /// Content must be non-empty after trimming, unless at least one
    /// attachment reference is present (attachment-only messages are
    /// allowed). Rejected with `Busy` while a reply is pending; the log
    /// is untouched on any rejection.
    pub fn append_user_message(
        &mut self,
        content: &str,
        attachments: &[String],
    ) -> Result<ChatMessage, SessionError> {
        if self.awaiting_reply {
            return Err(SessionError::Busy);
        }
        let trimmed = content.trim();
        if trimmed.is_empty() && attachments.is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        if trimmed.len() > MAX_MESSAGE_LEN {
            return Err(SessionError::MessageTooLong {
                max: MAX_MESSAGE_LEN,
            });
        }

        let msg = ChatMessage::new(MessageSender::User, trimmed)
            .with_attachments(attachments.to_vec());
        self.messages.push(msg.clone());
        self.awaiting_reply = true;
        Ok(msg)
    }

    /// Append an assistant message and clear the pending-reply flag.
    /// Always succeeds.
    pub fn append_assistant_message(
        &mut self,
        content: &str,
        suggestions: &[String],
    ) -> ChatMessage {
        let msg = ChatMessage::new(MessageSender::Assistant, content)
            .with_suggestions(suggestions.to_vec());
        self.messages.push(msg.clone());
        self.awaiting_reply = false;
        msg
    }

    /// Append an assistant message without touching the pending-reply
    /// flag.
    ///
    /// Used for the per-file analysis notes inside an upload batch: the
    /// batch is one outstanding cycle, so the busy guard must hold until
    /// the last file is done.
    pub fn append_assistant_update(&mut self, content: &str) -> ChatMessage {
        let msg = ChatMessage::new(MessageSender::Assistant, content);
        self.messages.push(msg.clone());
        msg
    }

    /// Clear the pending-reply flag without appending anything.
    ///
    /// Called when the gateway errors, times out, or is cancelled; the
    /// user message that started the cycle stays in the log.
    pub fn fail_pending_reply(&mut self) {
        self.awaiting_reply = false;
    }

    /// The current ordered message log.
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Content-only view of the log, in order.
    ///
    /// This is the lossy hand-off given to the doctor directory: sender
    /// attribution and timestamps are deliberately discarded.
    pub fn history_contents(&self) -> Vec<String> {
        self.messages.iter().map(|m| m.content.clone()).collect()
    }

    pub fn awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// SessionHandle + SessionRegistry
// ═══════════════════════════════════════════════════════════

/// A live session plus its cancellation token.
///
/// The token is cancelled when the session is discarded, which aborts
/// any gateway call still in flight for it.
pub struct SessionHandle {
    pub id: Uuid,
    session: Mutex<ConversationSession>,
    cancel: CancellationToken,
}

impl SessionHandle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            session: Mutex::new(ConversationSession::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Lock the inner session. Guards must not be held across await points.
    pub fn lock(&self) -> Result<MutexGuard<'_, ConversationSession>, SessionError> {
        self.session.lock().map_err(|_| SessionError::LockPoisoned)
    }

    /// Resolves when the session has been discarded.
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// In-memory owner of all live sessions.
///
/// Uses `RwLock` so concurrent lookups (the common case) do not block
/// each other; writes happen only on create and discard.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<Uuid, Arc<SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new session and return its handle.
    pub fn create(&self) -> Result<Arc<SessionHandle>, SessionError> {
        let handle = Arc::new(SessionHandle::new());
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| SessionError::LockPoisoned)?;
        sessions.insert(handle.id, handle.clone());
        tracing::debug!(session_id = %handle.id, "Session created");
        Ok(handle)
    }

    /// Look up a live session by id.
    pub fn get(&self, id: &Uuid) -> Result<Option<Arc<SessionHandle>>, SessionError> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| SessionError::LockPoisoned)?;
        Ok(sessions.get(id).cloned())
    }

    /// Discard a session: remove it from the registry and cancel any
    /// in-flight gateway call tied to it. Returns whether it existed.
    pub fn discard(&self, id: &Uuid) -> Result<bool, SessionError> {
        let removed = {
            let mut sessions = self
                .sessions
                .write()
                .map_err(|_| SessionError::LockPoisoned)?;
            sessions.remove(id)
        };
        match removed {
            Some(handle) => {
                handle.cancel.cancel();
                tracing::debug!(session_id = %id, "Session discarded");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Number of live sessions.
    pub fn live_count(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_seeds_greeting() {
        let session = ConversationSession::new();
        assert_eq!(session.len(), 1);
        assert_eq!(session.snapshot()[0].sender, MessageSender::Assistant);
        assert_eq!(session.snapshot()[0].content, GREETING);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn empty_message_without_attachments_rejected() {
        let mut session = ConversationSession::new();
        let before = session.len();

        let result = session.append_user_message("   ", &[]);
        assert!(matches!(result, Err(SessionError::EmptyMessage)));
        assert_eq!(session.len(), before);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn attachment_only_message_allowed() {
        let mut session = ConversationSession::new();
        let msg = session
            .append_user_message("", &["scan.png".to_string()])
            .unwrap();
        assert_eq!(msg.attachments, vec!["scan.png".to_string()]);
        assert!(session.awaiting_reply());
    }

    #[test]
    fn over_long_message_rejected() {
        let mut session = ConversationSession::new();
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        let result = session.append_user_message(&long, &[]);
        assert!(matches!(result, Err(SessionError::MessageTooLong { .. })));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn successful_send_cycle() {
        let mut session = ConversationSession::new();

        session.append_user_message("headache", &[]).unwrap();
        assert_eq!(session.len(), 2);
        assert!(session.awaiting_reply());

        session.append_assistant_message("See a specialist.", &[]);
        assert_eq!(session.len(), 3);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn failed_send_cycle_keeps_user_message() {
        let mut session = ConversationSession::new();

        session.append_user_message("headache", &[]).unwrap();
        session.fail_pending_reply();

        assert_eq!(session.len(), 2);
        assert_eq!(session.snapshot()[1].content, "headache");
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn assistant_update_keeps_pending_flag() {
        let mut session = ConversationSession::new();
        session
            .append_user_message("", &["scan.png".to_string()])
            .unwrap();

        session.append_assistant_update("Processing the first file.");
        assert!(session.awaiting_reply());
        assert_eq!(session.len(), 3);

        session.append_assistant_message("All files processed.", &[]);
        assert!(!session.awaiting_reply());
    }

    #[test]
    fn send_while_awaiting_is_busy() {
        let mut session = ConversationSession::new();
        session.append_user_message("first", &[]).unwrap();

        let result = session.append_user_message("second", &[]);
        assert!(matches!(result, Err(SessionError::Busy)));
        assert_eq!(session.len(), 2);
        assert!(session.awaiting_reply());
    }

    #[test]
    fn log_is_append_only_prefix_stable() {
        let mut session = ConversationSession::new();
        session.append_user_message("one", &[]).unwrap();
        session.append_assistant_message("reply one", &[]);

        let prefix: Vec<Uuid> = session.snapshot().iter().map(|m| m.id).collect();

        session.append_user_message("two", &[]).unwrap();
        session.append_assistant_message("reply two", &[]);

        let later: Vec<Uuid> = session.snapshot().iter().map(|m| m.id).collect();
        assert_eq!(&later[..prefix.len()], &prefix[..]);
    }

    #[test]
    fn content_is_trimmed_on_append() {
        let mut session = ConversationSession::new();
        let msg = session.append_user_message("  headache  ", &[]).unwrap();
        assert_eq!(msg.content, "headache");
    }

    #[test]
    fn history_contents_drops_sender_and_timestamp() {
        let mut session = ConversationSession::new();
        session.append_user_message("my knee hurts", &[]).unwrap();

        let contents = session.history_contents();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0], GREETING);
        assert_eq!(contents[1], "my knee hurts");
    }

    // ── Registry ──

    #[test]
    fn registry_create_and_get() {
        let registry = SessionRegistry::new();
        let handle = registry.create().unwrap();

        let fetched = registry.get(&handle.id).unwrap();
        assert!(fetched.is_some());
        assert_eq!(registry.live_count(), 1);
    }

    #[test]
    fn registry_get_unknown_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.get(&Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn discard_removes_and_cancels() {
        let registry = SessionRegistry::new();
        let handle = registry.create().unwrap();

        assert!(registry.discard(&handle.id).unwrap());
        assert!(registry.get(&handle.id).unwrap().is_none());
        assert!(handle.is_cancelled());
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn discard_unknown_returns_false() {
        let registry = SessionRegistry::new();
        assert!(!registry.discard(&Uuid::new_v4()).unwrap());
    }

    #[test]
    fn sessions_are_independent() {
        let registry = SessionRegistry::new();
        let a = registry.create().unwrap();
        let b = registry.create().unwrap();

        a.lock().unwrap().append_user_message("only in a", &[]).unwrap();

        assert_eq!(a.lock().unwrap().len(), 2);
        assert_eq!(b.lock().unwrap().len(), 1);
    }

    #[test]
    fn concurrent_lookups_do_not_block() {
        use std::thread;

        let registry = Arc::new(SessionRegistry::new());
        let handle = registry.create().unwrap();
        let id = handle.id;

        let mut handles = vec![];
        for _ in 0..10 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                assert!(registry.get(&id).unwrap().is_some());
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }
}
