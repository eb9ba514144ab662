//! Request DTOs for the inspection API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes.
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /set
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRequest {
    pub key: String,
    /// Any JSON value
    pub value: Value,
    /// TTL in milliseconds (store default if omitted)
    #[serde(default)]
    pub ttl_millis: Option<u64>,
    /// Store without expiry; overrides `ttlMillis`
    #[serde(default)]
    pub persistent: bool,
}

impl SetRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Query string for GET /keys
#[derive(Debug, Clone, Deserialize)]
pub struct KeysQuery {
    /// Glob pattern, `*` when omitted
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    "*".to_string()
}
