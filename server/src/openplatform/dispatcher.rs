//! Event Dispatcher
//!
//! Routes one authenticated push to the handler registered for its
//! `InfoType`. Two entry points:
//!
//! - [`EventDispatcher::dispatch`] ("serve"): run the handler and hand the
//!   message back to the caller for its own response formatting.
//! - [`EventDispatcher::listen`]: optionally forward the event through a
//!   callback, then return the handler's reply.
//!
//! A handler is built per call and never shared between calls.

use std::sync::Arc;

use op_common::{Message, Ticket};
use thiserror::Error;
use tracing::{debug, warn};

use super::handlers::{ForwardedEvent, HandlerError, HandlerReply};
use super::registry::{HandlerFactory, HandlerRegistry};

/// Dispatch errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No handler is registered for the message's `InfoType`.
    #[error("Event Info Type \"{0}\" does not exist")]
    UnknownEventType(String),

    /// The handler itself failed.
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Stateless router over a shared [`HandlerRegistry`].
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    registry: Arc<HandlerRegistry>,
}

impl EventDispatcher {
    pub const fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Look up the handler factory for a message.
    pub fn resolve_handler(&self, message: &Message) -> Result<&HandlerFactory, DispatchError> {
        let info_type = message.info_type().unwrap_or_default();

        self.registry.resolve(info_type).ok_or_else(|| {
            warn!(info_type = %info_type, "Push with unregistered event type");
            DispatchError::UnknownEventType(info_type.to_string())
        })
    }

    /// Serve mode: run the handler once and return `(InfoType, message)`.
    ///
    /// The handler's reply is discarded; its errors are not.
    pub fn dispatch(
        &self,
        message: Message,
        ticket: Ticket,
    ) -> Result<(String, Message), DispatchError> {
        let factory = self.resolve_handler(&message)?;
        let mut handler = factory(ticket);

        handler.handle(&message)?;

        let info_type = message.info_type().unwrap_or_default().to_string();
        debug!(info_type = %info_type, "Push dispatched");

        Ok((info_type, message))
    }

    /// Listen mode: forward through `on_forward` when given, then handle.
    ///
    /// Forwarding and handling share one handler instance. Returns the
    /// handler's reply, never the forwarded value.
    pub fn listen<F>(
        &self,
        message: &Message,
        ticket: Ticket,
        on_forward: Option<F>,
    ) -> Result<HandlerReply, DispatchError>
    where
        F: FnOnce(ForwardedEvent),
    {
        let factory = self.resolve_handler(message)?;
        let mut handler = factory(ticket);

        if let Some(callback) = on_forward {
            callback(handler.forward(message)?);
        }

        let reply = handler.handle(message)?;
        debug!(info_type = message.info_type().unwrap_or_default(), "Push handled");

        Ok(reply)
    }
}
