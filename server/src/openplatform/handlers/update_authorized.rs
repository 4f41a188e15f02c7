//! `updateauthorized` push

use std::sync::Arc;

use op_common::{Message, Ticket};
use tracing::{info, warn};

use super::{EventHandler, HandlerError, HandlerReply};
use crate::openplatform::authorizations::{Authorization, AuthorizationStore};

/// Replaces an authorizer's grant after a scope change.
pub struct UpdateAuthorizedHandler {
    _ticket: Ticket,
    store: Arc<AuthorizationStore>,
}

impl UpdateAuthorizedHandler {
    pub fn new(ticket: Ticket, store: Arc<AuthorizationStore>) -> Self {
        Self {
            _ticket: ticket,
            store,
        }
    }
}

impl EventHandler for UpdateAuthorizedHandler {
    fn handle(&mut self, message: &Message) -> Result<HandlerReply, HandlerError> {
        let grant = Authorization::from_message(message)?;
        let authorizer_app_id = grant.authorizer_app_id.clone();

        if !self.store.upsert(grant) {
            // Grant predates this process; treat the update as a fresh grant.
            warn!(authorizer_app_id = %authorizer_app_id, "Update for unknown authorizer");
        }

        info!(authorizer_app_id = %authorizer_app_id, "Authorizer grant updated");

        Ok(HandlerReply::success())
    }
}
