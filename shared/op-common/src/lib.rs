//! Open Platform Common Library
//!
//! Push message types shared by the receiver, the dispatcher and the handlers.

pub mod error;
pub mod types;

pub use error::{MessageError, Result};
pub use types::*;
