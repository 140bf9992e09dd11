//! Consultation orchestrator — runs the send and upload cycles against
//! a session and a message gateway.
//!
//! A cycle is: append user message (sets the pending-reply flag) →
//! gateway call → append assistant reply, or clear the flag on
//! error/timeout/cancellation. The gateway call is raced against a
//! configurable timeout and the session's cancellation token, so a hung
//! backend or a discarded session can never leave the flag stuck.

use std::sync::Arc;
use std::time::Duration;

use crate::config::DEFAULT_REPLY_TIMEOUT_SECS;
use crate::gateway::{AttachmentReceipt, ChatReply, FileUpload, GatewayError, MessageGateway};
use crate::models::ChatMessage;
use crate::session::{SessionError, SessionHandle};

#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("No reply within {0:?}")]
    TimedOut(Duration),
    #[error("Session discarded while awaiting reply")]
    Cancelled,
    #[error("Upload batch contains no files")]
    EmptyBatch,
}

/// Result of a completed send cycle.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: ChatMessage,
    pub reply_message: ChatMessage,
    pub reply: ChatReply,
}

/// Result of a completed upload cycle.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub user_message: ChatMessage,
    pub receipts: Vec<AttachmentReceipt>,
    pub analysis_messages: Vec<ChatMessage>,
}

/// Drives send/upload cycles for any session against one gateway.
pub struct ConsultService {
    gateway: Arc<dyn MessageGateway>,
    reply_timeout: Duration,
}

impl ConsultService {
    pub fn new(gateway: Arc<dyn MessageGateway>) -> Self {
        Self {
            gateway,
            reply_timeout: Duration::from_secs(DEFAULT_REPLY_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, reply_timeout: Duration) -> Self {
        self.reply_timeout = reply_timeout;
        self
    }

    /// Run a full send cycle: validate and append the user message, call
    /// the gateway, append the reply. On any failure the pending-reply
    /// flag is cleared and the user message stays in the log.
    pub async fn send(
        &self,
        handle: &SessionHandle,
        text: &str,
    ) -> Result<SendOutcome, ConsultError> {
        // Snapshot first: the gateway gets the prior log as context, not
        // the message being submitted.
        let (user_message, history) = {
            let mut session = handle.lock()?;
            let history = session.snapshot().to_vec();
            let msg = session.append_user_message(text, &[])?;
            (msg, history)
        };

        let reply = match self
            .await_gateway(
                handle,
                self.gateway.send_message(&user_message.content, &history),
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                self.clear_pending(handle);
                tracing::warn!(session_id = %handle.id, error = %e, "Send cycle failed");
                return Err(e);
            }
        };

        let reply_message = {
            let mut session = handle.lock()?;
            session.append_assistant_message(&reply.message, &reply.suggestions)
        };

        tracing::info!(session_id = %handle.id, "Send cycle completed");
        Ok(SendOutcome {
            user_message,
            reply_message,
            reply,
        })
    }

    /// Run an upload cycle: append one user message carrying the file
    /// names as attachment references, then upload each file strictly in
    /// submission order. Each file's analysis message is appended before
    /// the next upload begins, and the whole batch counts as one
    /// outstanding cycle: the pending-reply flag stays set until the last
    /// file is done, so concurrent sends are rejected busy throughout.
    /// A failed upload stops the batch; completed uploads are not rolled
    /// back.
    pub async fn upload(
        &self,
        handle: &SessionHandle,
        note: &str,
        files: &[FileUpload],
    ) -> Result<UploadOutcome, ConsultError> {
        if files.is_empty() {
            return Err(ConsultError::EmptyBatch);
        }

        let names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        let user_message = {
            let mut session = handle.lock()?;
            session.append_user_message(note, &names)?
        };

        let mut receipts = Vec::with_capacity(files.len());
        let mut analysis_messages = Vec::new();

        for file in files {
            let receipt = match self
                .await_gateway(handle, self.gateway.upload_file(file))
                .await
            {
                Ok(receipt) => receipt,
                Err(e) => {
                    self.clear_pending(handle);
                    tracing::warn!(
                        session_id = %handle.id,
                        file_name = %file.file_name,
                        error = %e,
                        "Upload cycle failed"
                    );
                    return Err(e);
                }
            };

            if let Some(analysis) = &receipt.analysis_text {
                let mut session = handle.lock()?;
                analysis_messages.push(session.append_assistant_update(analysis));
            }
            receipts.push(receipt);
        }

        // End of batch: clear the flag without a further append.
        {
            let mut session = handle.lock()?;
            session.fail_pending_reply();
        }

        tracing::info!(
            session_id = %handle.id,
            files = receipts.len(),
            "Upload cycle completed"
        );
        Ok(UploadOutcome {
            user_message,
            receipts,
            analysis_messages,
        })
    }

    /// Race a gateway future against the reply timeout and the session's
    /// cancellation token.
    async fn await_gateway<T>(
        &self,
        handle: &SessionHandle,
        call: impl std::future::Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, ConsultError> {
        tokio::select! {
            result = call => result.map_err(ConsultError::from),
            _ = tokio::time::sleep(self.reply_timeout) => {
                Err(ConsultError::TimedOut(self.reply_timeout))
            }
            _ = handle.cancelled() => Err(ConsultError::Cancelled),
        }
    }

    fn clear_pending(&self, handle: &SessionHandle) {
        if let Ok(mut session) = handle.lock() {
            session.fail_pending_reply();
        }
    }
}
