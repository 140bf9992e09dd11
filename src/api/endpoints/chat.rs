//! Chat endpoints.
//!
//! Five endpoints:
//! - `POST /api/chat/session` — create a session (returns the greeting)
//! - `GET /api/chat/session/:id` — session snapshot
//! - `DELETE /api/chat/session/:id` — discard a session (cancels in-flight work)
//! - `POST /api/chat/send` — run a full send cycle
//! - `POST /api/chat/upload` — run a sequential upload cycle

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::config::{MAX_UPLOAD_BYTES, MAX_UPLOAD_FILES};
use crate::gateway::FileUpload;
use crate::models::{ChatMessage, UrgencyLevel};

const DISCLAIMER: &str =
    "This assistant offers general guidance only. Always confirm with a healthcare professional.";

// ═══════════════════════════════════════════
// Session lifecycle
// ═══════════════════════════════════════════

#[derive(Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub awaiting_reply: bool,
    pub messages: Vec<ChatMessage>,
}

/// `POST /api/chat/session` — create a new session.
pub async fn create_session(
    State(ctx): State<ApiContext>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = ctx.sessions.create()?;
    let session = handle.lock()?;

    Ok(Json(SessionResponse {
        session_id: handle.id.to_string(),
        awaiting_reply: session.awaiting_reply(),
        messages: session.snapshot().to_vec(),
    }))
}

/// `GET /api/chat/session/:id` — snapshot of the message log.
pub async fn get_session(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = ctx.resolve_session(&session_id)?;
    let session = handle.lock()?;

    Ok(Json(SessionResponse {
        session_id: handle.id.to_string(),
        awaiting_reply: session.awaiting_reply(),
        messages: session.snapshot().to_vec(),
    }))
}

/// `DELETE /api/chat/session/:id` — discard a session.
pub async fn discard_session(
    State(ctx): State<ApiContext>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let handle = ctx.resolve_session(&session_id)?;
    ctx.sessions.discard(&handle.id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ═══════════════════════════════════════════
// Send
// ═══════════════════════════════════════════

#[derive(Deserialize)]
pub struct ChatSendRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatSendResponse {
    pub session_id: String,
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_specialist: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency_level: Option<UrgencyLevel>,
    pub disclaimer: &'static str,
}

/// `POST /api/chat/send` — submit a message and wait for the reply.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatSendRequest>,
) -> Result<Json<ChatSendResponse>, ApiError> {
    let handle = ctx.resolve_session(&req.session_id)?;
    let outcome = ctx.consult.send(&handle, &req.message).await?;

    Ok(Json(ChatSendResponse {
        session_id: handle.id.to_string(),
        user_message: outcome.user_message,
        reply: outcome.reply_message,
        requires_specialist: outcome.reply.requires_specialist,
        urgency_level: outcome.reply.urgency_level,
        disclaimer: DISCLAIMER,
    }))
}

// ═══════════════════════════════════════════
// Upload
// ═══════════════════════════════════════════

#[derive(Deserialize)]
pub struct UploadFilePayload {
    pub file_name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
    /// Base64-encoded content. Optional in the demo: metadata alone is
    /// enough for the simulated analysis.
    #[serde(default)]
    pub data: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatUploadRequest {
    pub session_id: String,
    #[serde(default)]
    pub note: String,
    pub files: Vec<UploadFilePayload>,
}

#[derive(Serialize)]
pub struct ChatUploadResponse {
    pub session_id: String,
    pub user_message: ChatMessage,
    pub receipts: Vec<crate::gateway::AttachmentReceipt>,
    pub analysis_messages: Vec<ChatMessage>,
}

fn decode_file(payload: &UploadFilePayload) -> Result<FileUpload, ApiError> {
    if payload.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("File name cannot be empty".into()));
    }
    let data = match &payload.data {
        Some(encoded) => base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| {
                ApiError::BadRequest(format!("Invalid base64 data for {}", payload.file_name))
            })?,
        None => Vec::new(),
    };
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest(format!(
            "File {} too large (max {MAX_UPLOAD_BYTES} bytes)",
            payload.file_name
        )));
    }
    Ok(FileUpload {
        file_name: payload.file_name.clone(),
        mime_type: payload.mime_type.clone(),
        size_bytes: payload.size_bytes.unwrap_or(data.len() as u64),
        data,
    })
}

/// `POST /api/chat/upload` — upload one or more files, sequentially.
pub async fn upload(
    State(ctx): State<ApiContext>,
    Json(req): Json<ChatUploadRequest>,
) -> Result<Json<ChatUploadResponse>, ApiError> {
    if req.files.is_empty() {
        return Err(ApiError::BadRequest("No files in upload".into()));
    }
    if req.files.len() > MAX_UPLOAD_FILES {
        return Err(ApiError::BadRequest(format!(
            "Maximum {MAX_UPLOAD_FILES} files per upload"
        )));
    }

    let handle = ctx.resolve_session(&req.session_id)?;
    let files = req
        .files
        .iter()
        .map(decode_file)
        .collect::<Result<Vec<_>, _>>()?;

    let outcome = ctx.consult.upload(&handle, &req.note, &files).await?;

    Ok(Json(ChatUploadResponse {
        session_id: handle.id.to_string(),
        user_message: outcome.user_message,
        receipts: outcome.receipts,
        analysis_messages: outcome.analysis_messages,
    }))
}
