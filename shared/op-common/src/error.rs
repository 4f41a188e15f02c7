//! Message Error Types

use thiserror::Error;

/// Errors raised while building a [`Message`](crate::Message) from raw input.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Body is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Body is valid JSON but not an object.
    #[error("Push body must be a JSON object")]
    NotAnObject,
}

/// Result type for message construction.
pub type Result<T> = std::result::Result<T, MessageError>;
