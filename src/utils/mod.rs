//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error type and result alias
//! - [`MessageResponse`] - `{ "message": "..." }` bodies for delete endpoints
//! - logging and money helpers

pub mod error;
pub mod logger;
pub mod money;
pub mod result;

pub use error::{AppError, ErrorBody};
pub use result::AppResult;

/// Plain message body used by delete confirmations and similar endpoints
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
