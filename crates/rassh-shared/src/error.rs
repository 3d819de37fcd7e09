//! Error types for RASSH dashboard components.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasshError {
    #[error("Honeypot unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("Socket.IO frame error: {0}")]
    Frame(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RasshError {
    /// Whether the error means the server could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, RasshError::Unreachable(_))
    }
}
