//! Domain data types shared across the session core, gateways, and API.

pub mod doctor;
pub mod enums;
pub mod message;

pub use doctor::Doctor;
pub use enums::{MessageSender, UrgencyLevel};
pub use message::ChatMessage;

/// Errors from model-level parsing.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
