//! `authorized` push

use std::sync::Arc;

use op_common::{Message, Ticket};
use tracing::info;

use super::{EventHandler, HandlerError, HandlerReply};
use crate::openplatform::authorizations::{Authorization, AuthorizationStore};

/// Records a new authorizer grant.
pub struct AuthorizedHandler {
    ticket: Ticket,
    store: Arc<AuthorizationStore>,
}

impl AuthorizedHandler {
    pub fn new(ticket: Ticket, store: Arc<AuthorizationStore>) -> Self {
        Self { ticket, store }
    }
}

impl EventHandler for AuthorizedHandler {
    fn handle(&mut self, message: &Message) -> Result<HandlerReply, HandlerError> {
        let grant = Authorization::from_message(message)?;
        let authorizer_app_id = grant.authorizer_app_id.clone();
        let replaced = self.store.upsert(grant);

        info!(
            authorizer_app_id = %authorizer_app_id,
            replaced,
            ticket_present = !self.ticket.is_empty(),
            "Authorizer granted access"
        );

        Ok(HandlerReply::success())
    }
}
