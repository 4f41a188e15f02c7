//! `unauthorized` push

use std::sync::Arc;

use op_common::{Message, Ticket};
use tracing::{debug, info};

use super::{authorizer_app_id, EventHandler, HandlerError, HandlerReply};
use crate::openplatform::authorizations::AuthorizationStore;

/// Drops an authorizer's grant. Repeated revocations are accepted.
pub struct UnauthorizedHandler {
    _ticket: Ticket,
    store: Arc<AuthorizationStore>,
}

impl UnauthorizedHandler {
    pub fn new(ticket: Ticket, store: Arc<AuthorizationStore>) -> Self {
        Self {
            _ticket: ticket,
            store,
        }
    }
}

impl EventHandler for UnauthorizedHandler {
    fn handle(&mut self, message: &Message) -> Result<HandlerReply, HandlerError> {
        let authorizer_app_id = authorizer_app_id(message)?;

        if self.store.remove(authorizer_app_id).is_some() {
            info!(authorizer_app_id = %authorizer_app_id, "Authorizer revoked access");
        } else {
            debug!(authorizer_app_id = %authorizer_app_id, "Revocation for unknown authorizer");
        }

        Ok(HandlerReply::success())
    }
}
