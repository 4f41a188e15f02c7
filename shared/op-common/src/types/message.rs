//! Push Message
//!
//! A parsed push notification. Only `InfoType` carries meaning for routing;
//! every other field is passed through to the handlers untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{MessageError, Result};

/// Field names used by the open platform push format.
pub mod fields {
    pub const INFO_TYPE: &str = "InfoType";
    pub const APP_ID: &str = "AppId";
    pub const CREATE_TIME: &str = "CreateTime";
    pub const COMPONENT_VERIFY_TICKET: &str = "ComponentVerifyTicket";
    pub const AUTHORIZER_APPID: &str = "AuthorizerAppid";
    pub const AUTHORIZATION_CODE: &str = "AuthorizationCode";
    pub const AUTHORIZATION_CODE_EXPIRED_TIME: &str = "AuthorizationCodeExpiredTime";
    pub const PRE_AUTH_CODE: &str = "PreAuthCode";
}

/// Immutable key/value record produced from one push notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message(Map<String, Value>);

impl Message {
    /// Parse a JSON object body.
    pub fn from_json_slice(body: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<Value>(body)? {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(MessageError::NotAnObject),
        }
    }

    /// Build a message from string pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), Value::String(v.into())))
                .collect(),
        )
    }

    /// Raw field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Field value if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Field value as an integer, accepting numeric strings.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The routing key.
    pub fn info_type(&self) -> Option<&str> {
        self.get_str(fields::INFO_TYPE)
    }

    /// Appid of the component the push was addressed to.
    pub fn app_id(&self) -> Option<&str> {
        self.get_str(fields::APP_ID)
    }

    /// Platform timestamp (unix seconds).
    pub fn create_time(&self) -> Option<i64> {
        self.get_i64(fields::CREATE_TIME)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying fields.
    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Message {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
