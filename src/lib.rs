//! Estate Cache - in-process caching for listing and market-data services
//!
//! A TTL cache with LRU eviction, a single-flight memoizer, a retry-with-backoff
//! fetcher for flaky upstreams, and a janitor task that sweeps expired entries.
//!
//! [`api`] and [`models`] only back the inspection binary; the caching types
//! re-exported here do not depend on them.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod memo;
pub mod models;
pub mod tasks;

pub use cache::{CacheStats, CacheStore, TtlStatus};
pub use config::Config;
pub use fetch::{fetch_with_retry, ResilientFetcher, RetryError, RetryPolicy};
pub use memo::{build_key, Cacheable, KeyStrategy, Memoizer, StructuralKey};
pub use tasks::CacheJanitor;
