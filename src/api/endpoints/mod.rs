//! HTTP endpoint handlers.

pub mod chat;
pub mod doctors;
pub mod health;
