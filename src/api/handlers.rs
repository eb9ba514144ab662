//! API Handlers
//!
//! HTTP request handlers for the cache inspection endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStats, CacheStore};
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, GetResponse, HealthResponse, KeysQuery, KeysResponse, MessageResponse,
    SetRequest, TtlResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store; the same handle the data services memoize into
    pub cache: Arc<CacheStore<Value>>,
}

impl AppState {
    pub fn new(cache: Arc<CacheStore<Value>>) -> Self {
        Self { cache }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Arc::new(CacheStore::from_config(config)))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<MessageResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    match (req.persistent, req.ttl_millis) {
        (true, _) => state.cache.set_persistent(req.key.clone(), req.value),
        (false, Some(ms)) => {
            state
                .cache
                .set_with_ttl(req.key.clone(), req.value, Duration::from_millis(ms))
        }
        (false, None) => state.cache.set(req.key.clone(), req.value),
    }

    Ok(Json(MessageResponse::set(req.key)))
}

/// Handler for GET /get/:key
///
/// Counts towards hit/miss statistics like any other read.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    if state.cache.delete(&key) {
        Ok(Json(MessageResponse::deleted(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.len();
    state.cache.clear();
    Json(ClearResponse { removed })
}

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TtlResponse> {
    let ttl = state.cache.ttl(&key);
    Json(TtlResponse::new(key, ttl))
}

/// Handler for GET /keys?pattern=
pub async fn keys_handler(
    State(state): State<AppState>,
    Query(query): Query<KeysQuery>,
) -> Json<KeysResponse> {
    let keys = state.cache.keys(&query.pattern);
    Json(KeysResponse {
        pattern: query.pattern,
        keys,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
