use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MessageSender;

/// A single entry in a conversation log.
///
/// Messages are immutable once created: the session only ever appends.
/// `attachments` carries opaque references to uploaded files (absent for
/// plain text); `suggestions` carries follow-up prompts on assistant
/// replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub content: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ChatMessage {
    /// Create a message with a fresh id and the current timestamp.
    pub fn new(sender: MessageSender, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
            attachments: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_message_has_unique_id() {
        let a = ChatMessage::new(MessageSender::User, "hello");
        let b = ChatMessage::new(MessageSender::User, "hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn empty_attachments_omitted_from_json() {
        let msg = ChatMessage::new(MessageSender::Assistant, "hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert!(json.get("attachments").is_none());
        assert!(json.get("suggestions").is_none());
        assert_eq!(json["sender"], "assistant");
    }

    #[test]
    fn attachments_survive_round_trip() {
        let msg = ChatMessage::new(MessageSender::User, "")
            .with_attachments(vec!["scan.png".into()]);
        let json = serde_json::to_string(&msg).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.attachments, vec!["scan.png".to_string()]);
    }
}
