//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Appid of the component this relay receives pushes for
    pub component_app_id: String,

    /// Shared token the push sender must present
    pub push_token: String,

    /// How long a received verify ticket stays usable (default: 43200 = 12 hours)
    pub ticket_ttl_secs: u64,

    /// Downstream URL that receives forwarded events (optional)
    pub forward_url: Option<String>,

    /// Capacity of the forwarding queue (default: 1024)
    pub forward_queue_size: usize,

    /// Maximum push body size in bytes (default: 64KB)
    pub max_body_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            component_app_id: required_var("COMPONENT_APP_ID")?,
            push_token: required_var("PUSH_TOKEN")?,
            ticket_ttl_secs: env::var("TICKET_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(43200),
            forward_url: env::var("FORWARD_URL")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            forward_queue_size: env::var("FORWARD_QUEUE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(1024),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64 * 1024), // 64KB
        })
    }

    /// Ticket lifetime as a `Duration`.
    #[must_use]
    pub const fn ticket_ttl(&self) -> Duration {
        Duration::from_secs(self.ticket_ttl_secs)
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            component_app_id: "wx_test_component".into(),
            push_token: "test-push-token".into(),
            ticket_ttl_secs: 43200,
            forward_url: None,
            forward_queue_size: 16,
            max_body_size: 64 * 1024,
        }
    }
}

/// Read a variable that must be set to a non-blank value.
fn required_var(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("{name} must be set"))
}
