//! Simulated message gateway — canned responses behind artificial latency.
//!
//! Stands in for a real chat/analysis backend during the demo. Response
//! selection and the specialist/urgency fields are randomized, but both
//! the latency and the RNG seed are injectable so tests see deterministic
//! behavior.

use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use super::types::{AttachmentReceipt, ChatReply, FileUpload, GatewayError, LatencyProfile};
use super::MessageGateway;
use crate::models::{ChatMessage, UrgencyLevel};

/// Canned assistant responses, picked at random per send.
const RESPONSES: [&str; 5] = [
    "I understand your concern. Based on what you've described, it could be related to several factors. Can you tell me more about when these symptoms started?",
    "Thank you for sharing those details. The symptoms you're experiencing could indicate a few different conditions. I'd recommend consulting with a specialist for a proper diagnosis.",
    "Based on your description, this seems like something that should be evaluated by a healthcare professional. I can help you find the right specialist.",
    "I've analyzed the information you've provided. While I can offer some general guidance, it's important to get a professional medical opinion for accurate diagnosis and treatment.",
    "Your symptoms warrant medical attention. I'd suggest scheduling an appointment with a relevant specialist to discuss your concerns in detail.",
];

/// Follow-up prompts attached to every reply.
const SUGGESTIONS: [&str; 4] = [
    "Can you describe the duration of symptoms?",
    "Have you experienced this before?",
    "Are you taking any medications?",
    "Would you like me to suggest some specialists?",
];

const URGENCY_LEVELS: [UrgencyLevel; 3] =
    [UrgencyLevel::Low, UrgencyLevel::Medium, UrgencyLevel::High];

/// In-process stand-in for the message exchange backend.
pub struct SimulatedGateway {
    send_latency: LatencyProfile,
    upload_latency: LatencyProfile,
    rng: Mutex<StdRng>,
}

impl SimulatedGateway {
    /// Demo timing: 1.0–2.0 s per send, 2 s per upload.
    pub fn new() -> Self {
        Self {
            send_latency: LatencyProfile::UniformMs(1000, 2000),
            upload_latency: LatencyProfile::FixedMs(2000),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Zero latency and a fixed RNG seed, for tests.
    pub fn deterministic(seed: u64) -> Self {
        Self {
            send_latency: LatencyProfile::None,
            upload_latency: LatencyProfile::None,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Override both latency profiles.
    pub fn with_latency(mut self, send: LatencyProfile, upload: LatencyProfile) -> Self {
        self.send_latency = send;
        self.upload_latency = upload;
        self
    }

    fn pick_reply(&self) -> Result<ChatReply, GatewayError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| GatewayError::Transport("rng lock poisoned".into()))?;
        let idx = rng.gen_range(0..RESPONSES.len());
        let requires_specialist = rng.gen_bool(0.5);
        let urgency = URGENCY_LEVELS[rng.gen_range(0..URGENCY_LEVELS.len())];

        Ok(ChatReply {
            message: RESPONSES[idx].to_string(),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            requires_specialist: Some(requires_specialist),
            urgency_level: Some(urgency),
        })
    }
}

impl Default for SimulatedGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the upload looks like an image, from the declared MIME type
/// or, failing that, a guess from the file name.
fn is_image(upload: &FileUpload) -> bool {
    if let Some(mime) = &upload.mime_type {
        return mime.starts_with("image/");
    }
    mime_guess::from_path(&upload.file_name)
        .first()
        .map(|m| m.type_() == mime_guess::mime::IMAGE)
        .unwrap_or(false)
}

#[async_trait]
impl MessageGateway for SimulatedGateway {
    async fn send_message(
        &self,
        text: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply, GatewayError> {
        self.send_latency.wait().await;
        tracing::debug!(
            text_len = text.len(),
            history_len = history.len(),
            "Simulated gateway answering send"
        );
        self.pick_reply()
    }

    async fn upload_file(&self, upload: &FileUpload) -> Result<AttachmentReceipt, GatewayError> {
        self.upload_latency.wait().await;

        let (kind, description) = if is_image(upload) {
            ("image", "a medical scan or photo")
        } else {
            ("document", "a medical document")
        };
        let analysis = format!(
            "I've successfully processed your {kind}. The file appears to be {description}. \
I can see the content and will include this in my analysis."
        );

        tracing::debug!(file_name = %upload.file_name, kind, "Simulated gateway processed upload");

        Ok(AttachmentReceipt {
            attachment_id: format!("file_{}", Uuid::new_v4().simple()),
            file_name: upload.file_name.clone(),
            analysis_text: Some(analysis),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mime: Option<&str>) -> FileUpload {
        FileUpload {
            file_name: name.into(),
            mime_type: mime.map(|m| m.to_string()),
            size_bytes: 42,
            data: vec![0u8; 42],
        }
    }

    #[tokio::test]
    async fn reply_comes_from_canned_pool() {
        let gateway = SimulatedGateway::deterministic(1);
        let reply = gateway.send_message("headache", &[]).await.unwrap();

        assert!(RESPONSES.contains(&reply.message.as_str()));
        assert_eq!(reply.suggestions.len(), 4);
        assert!(reply.requires_specialist.is_some());
        assert!(reply.urgency_level.is_some());
    }

    #[tokio::test]
    async fn same_seed_same_reply() {
        let a = SimulatedGateway::deterministic(7)
            .send_message("x", &[])
            .await
            .unwrap();
        let b = SimulatedGateway::deterministic(7)
            .send_message("x", &[])
            .await
            .unwrap();
        assert_eq!(a.message, b.message);
        assert_eq!(a.requires_specialist, b.requires_specialist);
        assert_eq!(a.urgency_level, b.urgency_level);
    }

    #[tokio::test]
    async fn upload_echoes_file_name() {
        let gateway = SimulatedGateway::deterministic(1);
        let receipt = gateway
            .upload_file(&upload("report.pdf", Some("application/pdf")))
            .await
            .unwrap();

        assert_eq!(receipt.file_name, "report.pdf");
        assert!(receipt.attachment_id.starts_with("file_"));
    }

    #[tokio::test]
    async fn image_mime_gets_scan_analysis() {
        let gateway = SimulatedGateway::deterministic(1);
        let receipt = gateway
            .upload_file(&upload("xray.png", Some("image/png")))
            .await
            .unwrap();

        assert!(receipt.analysis_text.unwrap().contains("medical scan or photo"));
    }

    #[tokio::test]
    async fn document_mime_gets_document_analysis() {
        let gateway = SimulatedGateway::deterministic(1);
        let receipt = gateway
            .upload_file(&upload("notes.pdf", Some("application/pdf")))
            .await
            .unwrap();

        assert!(receipt.analysis_text.unwrap().contains("medical document"));
    }

    #[tokio::test]
    async fn missing_mime_guessed_from_file_name() {
        let gateway = SimulatedGateway::deterministic(1);
        let receipt = gateway.upload_file(&upload("photo.jpg", None)).await.unwrap();

        assert!(receipt.analysis_text.unwrap().contains("medical scan or photo"));
    }

    #[tokio::test]
    async fn distinct_uploads_get_distinct_ids() {
        let gateway = SimulatedGateway::deterministic(1);
        let a = gateway.upload_file(&upload("a.pdf", None)).await.unwrap();
        let b = gateway.upload_file(&upload("b.pdf", None)).await.unwrap();
        assert_ne!(a.attachment_id, b.attachment_id);
    }
}
