//! Cacheable function wrapper.
//!
//! Binds an async lookup to a logical name, a TTL and a key strategy, so data
//! access services can hold a memoized callable instead of threading the
//! memoizer through every call site.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::memo::key::build_key;
use crate::memo::Memoizer;

// == Key Strategy ==
/// Derives the cache key for one call.
pub trait KeyStrategy<A>: Send + Sync {
    fn derive_key(&self, name: &str, args: &A) -> String;
}

/// Canonical structural encoding of JSON arguments (see [`build_key`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralKey;

impl KeyStrategy<Value> for StructuralKey {
    fn derive_key(&self, name: &str, args: &Value) -> String {
        build_key(name, args)
    }
}

impl<A, F> KeyStrategy<A> for F
where
    F: Fn(&str, &A) -> String + Send + Sync,
{
    fn derive_key(&self, name: &str, args: &A) -> String {
        self(name, args)
    }
}

// == Cacheable ==
/// A memoized async function.
pub struct Cacheable<V, E, K, F> {
    memoizer: Memoizer<V, E>,
    name: String,
    ttl: Duration,
    key_strategy: K,
    func: F,
}

impl<V, E, F> Cacheable<V, E, StructuralKey, F>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Wraps `func` using structural keys over JSON arguments.
    pub fn new(memoizer: Memoizer<V, E>, name: impl Into<String>, ttl: Duration, func: F) -> Self {
        Self {
            memoizer,
            name: name.into(),
            ttl,
            key_strategy: StructuralKey,
            func,
        }
    }
}

impl<V, E, K, F> Cacheable<V, E, K, F>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Replaces the key strategy.
    pub fn with_key_strategy<K2>(self, key_strategy: K2) -> Cacheable<V, E, K2, F> {
        Cacheable {
            memoizer: self.memoizer,
            name: self.name,
            ttl: self.ttl,
            key_strategy,
            func: self.func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Calls the wrapped function at most once per key per TTL window.
    pub async fn call<A, Fut>(&self, args: A) -> Result<V, E>
    where
        K: KeyStrategy<A>,
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let key = self.key_strategy.derive_key(&self.name, &args);
        let func = &self.func;
        self.memoizer
            .get_or_compute_key(key, self.ttl, move || func(args))
            .await
    }
}
