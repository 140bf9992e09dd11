//! Message exchange gateway — the contract for submitting a chat message
//! or file upload to a backend, independent of transport.
//!
//! The current backend is `SimulatedGateway` (canned data behind
//! configurable latency); a production replacement would satisfy the same
//! trait with real network calls. Callers must treat every failure as
//! recoverable: a gateway error never leaves the session's pending-reply
//! flag stuck and never partially appends to the log.

pub mod simulated;
pub mod types;

use async_trait::async_trait;

pub use simulated::SimulatedGateway;
pub use types::{AttachmentReceipt, ChatReply, FileUpload, GatewayError, LatencyProfile};

use crate::models::ChatMessage;

/// Backend contract for chat and upload requests.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Submit a user message with the full prior log for context.
    async fn send_message(
        &self,
        text: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply, GatewayError>;

    /// Upload a single file. Multi-file submissions call this once per
    /// file; each call is an independent request.
    async fn upload_file(&self, upload: &FileUpload) -> Result<AttachmentReceipt, GatewayError>;
}
