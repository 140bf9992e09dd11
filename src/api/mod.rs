//! HTTP API — axum router, endpoint handlers, shared context, error mapping.
//!
//! The API is a thin shell over the core modules: handlers resolve a
//! session, delegate to [`crate::consult::ConsultService`] or the doctor
//! directory, and translate errors into structured JSON bodies.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use types::ApiContext;
