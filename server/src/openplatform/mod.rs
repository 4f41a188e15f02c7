//! Open Platform Push Relay
//!
//! Receives component pushes, classifies them by `InfoType` and dispatches to
//! the registered handler with the current verify ticket.

pub mod authorizations;
pub mod dispatcher;
pub mod error;
pub mod forward;
pub mod handlers;
pub mod receiver;
pub mod registry;
pub mod routes;
pub mod ticket;

pub use dispatcher::{DispatchError, EventDispatcher};
pub use registry::HandlerRegistry;
