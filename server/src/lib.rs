//! Open Platform Push Relay
//!
//! Receives push notifications from the messaging platform's open platform,
//! keeps the rotating component verify ticket and dispatches each push to the
//! handler registered for its `InfoType`.

pub mod api;
pub mod config;
pub mod openplatform;
