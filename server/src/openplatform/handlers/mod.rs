//! Push Event Handlers
//!
//! One handler per `InfoType`. Handlers are built fresh for every push by a
//! factory in the [`HandlerRegistry`](super::registry::HandlerRegistry) and
//! dropped when the dispatch call returns.

mod authorized;
mod component_verify_ticket;
mod unauthorized;
mod update_authorized;

pub use authorized::AuthorizedHandler;
pub use component_verify_ticket::ComponentVerifyTicketHandler;
pub use unauthorized::UnauthorizedHandler;
pub use update_authorized::UpdateAuthorizedHandler;

use chrono::{DateTime, Utc};
use op_common::{fields, Message};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Body the platform expects in response to a push.
pub const SUCCESS_REPLY: &str = "success";

/// Result of a handler's primary operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerReply(String);

impl HandlerReply {
    /// The acknowledgement every built-in handler returns.
    pub fn success() -> Self {
        Self(SUCCESS_REPLY.to_string())
    }

    pub fn new(body: impl Into<String>) -> Self {
        Self(body.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Event handed to the forwarding callback in listen mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardedEvent {
    /// Derived from the message body, so a redelivered push keeps its id and
    /// downstream can de-duplicate on it.
    pub event_id: Uuid,
    pub info_type: String,
    pub app_id: Option<String>,
    pub create_time: Option<i64>,
    pub received_at: DateTime<Utc>,
    pub message: Message,
}

impl ForwardedEvent {
    /// Build a forwarded event carrying the whole message.
    pub fn from_message(message: &Message) -> Self {
        Self {
            event_id: event_id(message),
            info_type: message.info_type().unwrap_or_default().to_string(),
            app_id: message.app_id().map(str::to_string),
            create_time: message.create_time(),
            received_at: Utc::now(),
            message: message.clone(),
        }
    }
}

/// Name-based id over the serialized message. Keys serialize in a fixed
/// order, so equal messages always map to the same id.
fn event_id(message: &Message) -> Uuid {
    let bytes = serde_json::to_vec(message).unwrap_or_default();
    Uuid::new_v5(&Uuid::NAMESPACE_OID, &bytes)
}

/// Errors raised inside a handler.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A field the handler depends on is missing or empty.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// A field is present but unusable.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// The handler refused the event.
    #[error("Event rejected: {0}")]
    Rejected(String),
}

/// Capability every push handler implements.
pub trait EventHandler: Send {
    /// Primary handling operation.
    fn handle(&mut self, message: &Message) -> Result<HandlerReply, HandlerError>;

    /// Build the value passed to a listen-mode forwarding callback.
    fn forward(&mut self, message: &Message) -> Result<ForwardedEvent, HandlerError> {
        Ok(ForwardedEvent::from_message(message))
    }
}

/// Read a required, non-empty string field.
pub(crate) fn required_str<'a>(
    message: &'a Message,
    field: &'static str,
) -> Result<&'a str, HandlerError> {
    match message.get_str(field) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(HandlerError::MissingField(field)),
    }
}

/// Authorizer appid shared by the three authorization events.
pub(crate) fn authorizer_app_id(message: &Message) -> Result<&str, HandlerError> {
    required_str(message, fields::AUTHORIZER_APPID)
}
