//! `component_verify_ticket` push

use std::sync::Arc;

use op_common::{fields, Message, Ticket};
use tracing::info;

use super::{required_str, EventHandler, HandlerError, HandlerReply};
use crate::openplatform::ticket::TicketHolder;

/// Stores the rotated ticket in the [`TicketHolder`].
pub struct ComponentVerifyTicketHandler {
    previous: Ticket,
    tickets: Arc<dyn TicketHolder>,
}

impl ComponentVerifyTicketHandler {
    pub fn new(previous: Ticket, tickets: Arc<dyn TicketHolder>) -> Self {
        Self { previous, tickets }
    }
}

impl EventHandler for ComponentVerifyTicketHandler {
    fn handle(&mut self, message: &Message) -> Result<HandlerReply, HandlerError> {
        let component_app_id = required_str(message, fields::APP_ID)?;
        let ticket = Ticket::new(required_str(message, fields::COMPONENT_VERIFY_TICKET)?);

        let rotated = ticket != self.previous;
        self.tickets.store(component_app_id, ticket);

        info!(
            component_app_id = %component_app_id,
            rotated,
            "Component verify ticket stored"
        );

        Ok(HandlerReply::success())
    }
}
