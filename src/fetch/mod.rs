//! Fetch Module
//!
//! Bounded retry with linear backoff for flaky upstream calls.

mod retry;

pub use retry::{fetch_with_retry, ResilientFetcher, RetryError, RetryPolicy};
