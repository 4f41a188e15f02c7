//! Push Types

mod info_type;
mod message;
mod ticket;

pub use info_type::InfoType;
pub use message::{fields, Message};
pub use ticket::Ticket;
