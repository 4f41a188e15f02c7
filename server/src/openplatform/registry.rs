//! Handler Registry
//!
//! Immutable table from `InfoType` to handler factory, built once at startup
//! and shared read-only by every request.

use std::collections::HashMap;
use std::sync::Arc;

use op_common::{InfoType, Ticket};

use super::authorizations::AuthorizationStore;
use super::handlers::{
    AuthorizedHandler, ComponentVerifyTicketHandler, EventHandler, UnauthorizedHandler,
    UpdateAuthorizedHandler,
};
use super::ticket::TicketHolder;

/// Builds a fresh handler for one push, given the current verify ticket.
pub type HandlerFactory = Arc<dyn Fn(Ticket) -> Box<dyn EventHandler> + Send + Sync>;

/// Mapping from event type to handler factory.
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::default()
    }

    /// Registry with the four open platform event handlers.
    pub fn open_platform(
        tickets: Arc<dyn TicketHolder>,
        authorizations: Arc<AuthorizationStore>,
    ) -> Self {
        let granted = Arc::clone(&authorizations);
        let updated = Arc::clone(&authorizations);
        let revoked = authorizations;

        Self::builder()
            .register(InfoType::Authorized.as_str(), move |ticket| {
                Box::new(AuthorizedHandler::new(ticket, Arc::clone(&granted)))
            })
            .register(InfoType::Unauthorized.as_str(), move |ticket| {
                Box::new(UnauthorizedHandler::new(ticket, Arc::clone(&revoked)))
            })
            .register(InfoType::UpdateAuthorized.as_str(), move |ticket| {
                Box::new(UpdateAuthorizedHandler::new(ticket, Arc::clone(&updated)))
            })
            .register(InfoType::ComponentVerifyTicket.as_str(), move |ticket| {
                Box::new(ComponentVerifyTicketHandler::new(
                    ticket,
                    Arc::clone(&tickets),
                ))
            })
            .build()
    }

    /// Exact-match lookup.
    pub fn resolve(&self, info_type: &str) -> Option<&HandlerFactory> {
        self.factories.get(info_type)
    }

    pub fn contains(&self, info_type: &str) -> bool {
        self.factories.contains_key(info_type)
    }

    /// Registered event types, sorted.
    pub fn event_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("event_types", &self.event_types())
            .finish()
    }
}

/// Collects factories before freezing them into a [`HandlerRegistry`].
#[derive(Default)]
pub struct HandlerRegistryBuilder {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistryBuilder {
    /// Bind an event type to a factory. A later registration for the same
    /// type replaces the earlier one.
    #[must_use]
    pub fn register<F>(mut self, info_type: impl Into<String>, factory: F) -> Self
    where
        F: Fn(Ticket) -> Box<dyn EventHandler> + Send + Sync + 'static,
    {
        self.factories.insert(info_type.into(), Arc::new(factory));
        self
    }

    pub fn build(self) -> HandlerRegistry {
        HandlerRegistry {
            factories: self.factories,
        }
    }
}
