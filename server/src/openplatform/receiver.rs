//! Push Receiver
//!
//! Authenticates an inbound push request and turns its body into a
//! [`Message`]. Authentication failures and malformed bodies are reported
//! as distinct errors.

use axum::http::HeaderMap;
use op_common::{Message, MessageError};
use thiserror::Error;

/// Header carrying the shared push token.
pub const PUSH_TOKEN_HEADER: &str = "x-push-token";

/// Push receiver errors.
#[derive(Debug, Error)]
pub enum PushError {
    /// Missing or wrong push token.
    #[error("Push authentication failed")]
    Unauthenticated,

    /// Push addressed to a different component.
    #[error("Push addressed to another component: {0}")]
    ForeignComponent(String),

    /// Body could not be parsed into a message.
    #[error("Malformed push body: {0}")]
    Malformed(#[from] MessageError),
}

/// Turns a raw request into an authenticated message.
pub trait PushReceiver: Send + Sync {
    fn receive(&self, headers: &HeaderMap, body: &[u8]) -> Result<Message, PushError>;
}

/// Receiver for JSON pushes authenticated by a shared token header.
pub struct TokenPushReceiver {
    token: String,
    component_app_id: String,
}

impl TokenPushReceiver {
    pub fn new(token: impl Into<String>, component_app_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            component_app_id: component_app_id.into(),
        }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<(), PushError> {
        let presented = headers
            .get(PUSH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(PushError::Unauthenticated)?;

        if !presented.is_empty()
            && !self.token.is_empty()
            && constant_time_eq(presented.as_bytes(), self.token.as_bytes())
        {
            Ok(())
        } else {
            Err(PushError::Unauthenticated)
        }
    }
}

impl PushReceiver for TokenPushReceiver {
    fn receive(&self, headers: &HeaderMap, body: &[u8]) -> Result<Message, PushError> {
        self.authenticate(headers)?;

        let message = Message::from_json_slice(body)?;

        // Pushes without AppId are left to the handlers that need it.
        if let Some(app_id) = message.app_id() {
            if app_id != self.component_app_id {
                return Err(PushError::ForeignComponent(app_id.to_string()));
            }
        }

        Ok(message)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
