//! Component Verify Ticket

use serde::{Deserialize, Serialize};

/// The platform's rotating component verify ticket.
///
/// Opaque to everything but the platform API client. `Debug` never prints
/// the value so tickets can't leak through structured logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(String);

impl Ticket {
    /// Wrap a raw ticket value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw ticket value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// True before the first ticket push has been received.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Ticket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            f.write_str("Ticket(<empty>)")
        } else {
            f.write_str("Ticket(<redacted>)")
        }
    }
}
