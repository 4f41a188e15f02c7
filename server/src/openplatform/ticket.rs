//! Verify Ticket Holder
//!
//! The platform pushes a fresh component verify ticket roughly every ten
//! minutes. The holder keeps the latest one per component appid and hands it
//! to the dispatcher on demand.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use op_common::Ticket;

/// Source of the current verify ticket.
pub trait TicketHolder: Send + Sync {
    /// Latest usable ticket for a component, if one has been received.
    fn current(&self, component_app_id: &str) -> Option<Ticket>;

    /// Replace the ticket for a component.
    fn store(&self, component_app_id: &str, ticket: Ticket);
}

struct StoredTicket {
    ticket: Ticket,
    received_at: Instant,
}

/// Process-local ticket holder. Tickets older than `ttl` read as absent.
pub struct MemoryTicketHolder {
    tickets: DashMap<String, StoredTicket>,
    ttl: Duration,
}

impl MemoryTicketHolder {
    pub fn new(ttl: Duration) -> Self {
        Self {
            tickets: DashMap::new(),
            ttl,
        }
    }
}

impl TicketHolder for MemoryTicketHolder {
    fn current(&self, component_app_id: &str) -> Option<Ticket> {
        let entry = self.tickets.get(component_app_id)?;
        if entry.received_at.elapsed() > self.ttl {
            return None;
        }
        Some(entry.ticket.clone())
    }

    fn store(&self, component_app_id: &str, ticket: Ticket) {
        self.tickets.insert(
            component_app_id.to_string(),
            StoredTicket {
                ticket,
                received_at: Instant::now(),
            },
        );
    }
}
