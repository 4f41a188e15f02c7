//! Authorizer Grants
//!
//! In-memory record of which authorizers have granted this component access,
//! maintained by the `authorized`, `updateauthorized` and `unauthorized`
//! handlers.

use chrono::{DateTime, TimeZone, Utc};
use dashmap::DashMap;
use op_common::{fields, Message};
use serde::Serialize;

use super::handlers::{authorizer_app_id, required_str, HandlerError};

/// One authorizer's grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorization {
    pub authorizer_app_id: String,
    /// Component the grant was issued to.
    pub component_app_id: Option<String>,
    /// Code exchanged for the authorizer access token.
    #[serde(skip_serializing)]
    pub authorization_code: String,
    pub code_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub pre_auth_code: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Authorization {
    /// Extract a grant from an `authorized` / `updateauthorized` push.
    pub fn from_message(message: &Message) -> Result<Self, HandlerError> {
        let authorizer_app_id = authorizer_app_id(message)?.to_string();
        let authorization_code = required_str(message, fields::AUTHORIZATION_CODE)?.to_string();

        let code_expires_at = match message.get(fields::AUTHORIZATION_CODE_EXPIRED_TIME) {
            None => None,
            Some(_) => {
                let secs = message
                    .get_i64(fields::AUTHORIZATION_CODE_EXPIRED_TIME)
                    .ok_or_else(|| HandlerError::InvalidField {
                        field: fields::AUTHORIZATION_CODE_EXPIRED_TIME,
                        reason: "expected unix seconds".to_string(),
                    })?;
                Some(Utc.timestamp_opt(secs, 0).single().ok_or_else(|| {
                    HandlerError::InvalidField {
                        field: fields::AUTHORIZATION_CODE_EXPIRED_TIME,
                        reason: format!("timestamp {secs} out of range"),
                    }
                })?)
            }
        };

        Ok(Self {
            authorizer_app_id,
            component_app_id: message.app_id().map(str::to_string),
            authorization_code,
            code_expires_at,
            pre_auth_code: message.get_str(fields::PRE_AUTH_CODE).map(str::to_string),
            updated_at: Utc::now(),
        })
    }
}

/// Thread-safe store of authorizer grants keyed by authorizer appid.
#[derive(Debug, Default)]
pub struct AuthorizationStore {
    grants: DashMap<String, Authorization>,
}

impl AuthorizationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a grant. Returns true if the authorizer was already known.
    pub fn upsert(&self, authorization: Authorization) -> bool {
        self.grants
            .insert(authorization.authorizer_app_id.clone(), authorization)
            .is_some()
    }

    /// Remove a grant. Returns the removed grant, if any.
    pub fn remove(&self, authorizer_app_id: &str) -> Option<Authorization> {
        self.grants.remove(authorizer_app_id).map(|(_, v)| v)
    }

    pub fn get(&self, authorizer_app_id: &str) -> Option<Authorization> {
        self.grants.get(authorizer_app_id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.grants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}
