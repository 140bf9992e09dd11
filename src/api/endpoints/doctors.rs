//! Doctor directory endpoints.
//!
//! - `GET /api/doctors` — full catalog
//! - `GET /api/doctors/:id` — single record
//! - `POST /api/doctors/recommend` — chat-keyed recommendation
//!
//! A client arriving from the chat screen (`from_chat = true` in its
//! navigation state) calls `recommend` with the content-only history
//! snapshot instead of the plain listing.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::Doctor;

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<Doctor>,
    pub total: usize,
}

/// `GET /api/doctors` — the full catalog, stable order.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<DoctorsResponse>, ApiError> {
    let doctors = ctx.doctors.list_all().await?;
    let total = doctors.len();
    Ok(Json(DoctorsResponse { doctors, total }))
}

/// `GET /api/doctors/:id` — a single doctor record.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let doctor = ctx
        .doctors
        .find(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Doctor not found".into()))?;
    Ok(Json(doctor))
}

#[derive(Deserialize)]
pub struct RecommendRequest {
    /// Ordered message contents from the chat session.
    #[serde(default)]
    pub chat_history: Vec<String>,
}

/// `POST /api/doctors/recommend` — recommendations keyed by chat history.
pub async fn recommend(
    State(ctx): State<ApiContext>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let doctors = ctx.doctors.recommend(&req.chat_history).await?;
    let total = doctors.len();
    Ok(Json(DoctorsResponse { doctors, total }))
}
