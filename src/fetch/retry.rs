//! Resilient fetcher.
//!
//! Retries a fallible async operation with linear backoff: the wait after
//! attempt `n` fails is `base_delay * n`.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;

// == Retry Error ==
/// Failure of a retried operation, carrying the last underlying error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RetryError<E> {
    /// Every attempt failed
    #[error("operation failed after {attempts} attempt(s): {last_error}")]
    Exhausted { attempts: u32, last_error: E },

    /// Cancelled between attempts; `last_error` is the last failure seen
    #[error("operation cancelled after {attempts} attempt(s): {last_error}")]
    Cancelled { attempts: u32, last_error: E },
}

impl<E> RetryError<E> {
    /// Number of times the operation was invoked.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } | RetryError::Cancelled { attempts, .. } => {
                *attempts
            }
        }
    }

    /// The last error returned by the operation.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { last_error, .. } | RetryError::Cancelled { last_error, .. } => {
                last_error
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RetryError::Cancelled { .. })
    }
}

// == Retry Policy ==
/// Attempt budget and backoff base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one; zero is treated as one
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_attempts, config.base_delay)
    }

    /// Attempts actually made, never less than one.
    pub fn effective_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the given (1-based) attempt fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// == Resilient Fetcher ==
/// Runs operations under a [`RetryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ResilientFetcher {
    policy: RetryPolicy,
}

impl ResilientFetcher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Calls `operation` until it succeeds or the attempt budget is spent.
    pub async fn fetch<T, E, F, Fut>(&self, operation: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run(operation, None).await
    }

    /// Like [`fetch`](Self::fetch), but stops retrying once `cancel` fires.
    ///
    /// An attempt already running is allowed to finish; cancellation cuts
    /// short the backoff wait and prevents further attempts.
    pub async fn fetch_with_cancel<T, E, F, Fut>(
        &self,
        operation: F,
        cancel: &CancellationToken,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run(operation, Some(cancel)).await
    }

    async fn run<T, E, F, Fut>(
        &self,
        mut operation: F,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_attempts = self.policy.effective_attempts();
        let mut attempt = 1;

        loop {
            let last_error = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= max_attempts {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last_error,
                });
            }

            let delay = self.policy.delay_for(attempt);
            debug!(attempt, max_attempts, delay_ms = delay.as_millis() as u64, "attempt failed, backing off");

            match cancel {
                Some(token) => {
                    if token.is_cancelled() {
                        return Err(RetryError::Cancelled {
                            attempts: attempt,
                            last_error,
                        });
                    }
                    tokio::select! {
                        _ = token.cancelled() => {
                            return Err(RetryError::Cancelled { attempts: attempt, last_error });
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                None => tokio::time::sleep(delay).await,
            }

            attempt += 1;
        }
    }
}

/// Retries `operation` up to `max_attempts` times with linear backoff.
pub async fn fetch_with_retry<T, E, F, Fut>(
    operation: F,
    max_attempts: u32,
    base_delay: Duration,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    ResilientFetcher::new(RetryPolicy::new(max_attempts, base_delay))
        .fetch(operation)
        .await
}
