//! Event Info Types
//!
//! The event kinds the open platform pushes to a component.

use serde::{Deserialize, Serialize};

/// Known values of the `InfoType` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InfoType {
    /// An authorizer granted the component access.
    #[serde(rename = "authorized")]
    Authorized,
    /// An authorizer revoked the component's access.
    #[serde(rename = "unauthorized")]
    Unauthorized,
    /// An authorizer changed the scope of an existing grant.
    #[serde(rename = "updateauthorized")]
    UpdateAuthorized,
    /// The platform rotated the component verify ticket.
    #[serde(rename = "component_verify_ticket")]
    ComponentVerifyTicket,
}

impl InfoType {
    /// Wire strings of every known event kind.
    pub const ALL: &'static [&'static str] = &[
        "authorized",
        "unauthorized",
        "updateauthorized",
        "component_verify_ticket",
    ];

    /// Convert to the wire string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Unauthorized => "unauthorized",
            Self::UpdateAuthorized => "updateauthorized",
            Self::ComponentVerifyTicket => "component_verify_ticket",
        }
    }
}

impl std::fmt::Display for InfoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
