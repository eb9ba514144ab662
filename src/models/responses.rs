//! Response DTOs for the inspection API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::TtlStatus;

/// Response body for GET /get/:key
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Generic acknowledgement for writes and deletes
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
    pub key: String,
}

impl MessageResponse {
    pub fn set(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }

    pub fn deleted(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for DELETE /clear
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Entries held before the clear, expired ones included
    pub removed: usize,
}

/// Response body for GET /ttl/:key
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtlResponse {
    pub key: String,
    /// "missing", "persistent" or "expires"
    pub status: &'static str,
    /// Remaining milliseconds, -1 persistent, -2 missing
    pub ttl_millis: i64,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, ttl: TtlStatus) -> Self {
        let status = match ttl {
            TtlStatus::Missing => "missing",
            TtlStatus::Persistent => "persistent",
            TtlStatus::Expires(_) => "expires",
        };
        Self {
            key: key.into(),
            status,
            ttl_millis: ttl.as_millis(),
        }
    }
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub pattern: String,
    pub keys: Vec<String>,
}

/// Response body for GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
