//! Request/response shapes for the gateway contracts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::UrgencyLevel;

/// Assistant reply to a submitted message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_specialist: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
}

/// A file handed to the gateway for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    pub data: Vec<u8>,
}

/// Result of a single file upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentReceipt {
    /// Opaque identifier assigned by the gateway.
    pub attachment_id: String,
    /// Original file name, informational only.
    pub file_name: String,
    /// Assistant-authored commentary to append as a follow-up message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_text: Option<String>,
}

/// Errors from gateway calls. All are per-operation and recoverable.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Upstream rejected request: {0}")]
    Rejected(String),
}

/// Artificial latency applied before a simulated gateway responds.
///
/// Injectable so tests run with `None` while the demo keeps the
/// original timing behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyProfile {
    /// Respond immediately (tests).
    None,
    /// Fixed delay in milliseconds.
    FixedMs(u64),
    /// Uniform random delay in milliseconds, inclusive bounds.
    UniformMs(u64, u64),
}

impl LatencyProfile {
    /// Sleep for the configured delay, if any.
    pub async fn wait(&self) {
        let ms = match self {
            Self::None => return,
            Self::FixedMs(ms) => *ms,
            Self::UniformMs(lo, hi) => rand::thread_rng().gen_range(*lo..=*hi),
        };
        tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_optional_fields_omitted() {
        let reply = ChatReply {
            message: "ok".into(),
            suggestions: vec![],
            requires_specialist: None,
            urgency_level: None,
        };
        let json = serde_json::to_value(&reply).unwrap();
        assert!(json.get("suggestions").is_none());
        assert!(json.get("requires_specialist").is_none());
        assert!(json.get("urgency_level").is_none());
    }

    #[tokio::test]
    async fn none_latency_returns_immediately() {
        let start = std::time::Instant::now();
        LatencyProfile::None.wait().await;
        assert!(start.elapsed().as_millis() < 50);
    }

    #[tokio::test]
    async fn fixed_latency_sleeps() {
        let start = std::time::Instant::now();
        LatencyProfile::FixedMs(30).wait().await;
        assert!(start.elapsed().as_millis() >= 30);
    }
}
