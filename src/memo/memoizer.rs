//! Memoizer
//!
//! Get-or-compute on top of [`CacheStore`], with single-flight collapsing of
//! concurrent misses for the same key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared, WeakShared};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::trace;

use crate::cache::CacheStore;
use crate::memo::key::{build_key, KEY_SEPARATOR};

type Flight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;
type FlightMap<V, E> = Arc<Mutex<FlightRegistry<V, E>>>;

/// In-flight computations, held weakly so a flight every caller abandoned
/// is dropped instead of lingering.
struct FlightRegistry<V, E> {
    flights: HashMap<String, Registered<V, E>>,
    next_id: u64,
}

struct Registered<V, E> {
    id: u64,
    flight: WeakShared<BoxFuture<'static, Result<V, E>>>,
}

// == Memoizer ==
/// Memoizes async lookups in a shared store.
///
/// Successful results are cached under `"{name}:{canonical args}"` for the
/// requested TTL. Failures are handed back to every waiter of that flight
/// and never cached. Cloning is cheap and clones share the in-flight
/// registry.
///
/// A flight runs only while at least one caller awaits it. If every caller
/// gives up (a timeout, a dropped task) the computation is dropped and the
/// next request for the key starts over.
pub struct Memoizer<V, E> {
    store: Arc<CacheStore<V>>,
    in_flight: FlightMap<V, E>,
}

impl<V, E> Clone for Memoizer<V, E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<V, E> Memoizer<V, E>
where
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<CacheStore<V>>) -> Self {
        Self {
            store,
            in_flight: Arc::new(Mutex::new(FlightRegistry {
                flights: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<CacheStore<V>> {
        &self.store
    }

    // == Get Or Compute ==
    /// Returns the cached value for `name` + `args`, or runs `compute` and
    /// caches its success for `ttl`.
    ///
    /// `compute` is only called when no live value and no in-flight
    /// computation exist for the key; it should just build the future, since
    /// it is invoked while the in-flight registry is locked.
    ///
    /// The key is derived eagerly, so the returned future does not borrow
    /// `name` or `args`.
    pub fn get_or_compute<'a, F, Fut>(
        &'a self,
        name: &str,
        args: &Value,
        ttl: Duration,
        compute: F,
    ) -> impl Future<Output = Result<V, E>> + 'a
    where
        F: FnOnce() -> Fut + 'a,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        self.get_or_compute_key(build_key(name, args), ttl, compute)
    }

    /// Same as [`get_or_compute`](Self::get_or_compute) for a key that was
    /// already derived.
    pub async fn get_or_compute_key<F, Fut>(
        &self,
        key: String,
        ttl: Duration,
        compute: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        if let Some(value) = self.store.get(&key) {
            return Ok(value);
        }

        let flight = {
            let mut registry = self.in_flight.lock();
            let existing = registry
                .flights
                .get(&key)
                .and_then(|registered| registered.flight.upgrade());

            if let Some(existing) = existing {
                trace!(key = %key, "joining in-flight computation");
                existing
            } else if let Some(value) = self.store.peek(&key) {
                // Another flight finished between the miss and taking the lock
                return Ok(value);
            } else {
                let id = registry.next_id;
                registry.next_id += 1;
                let flight = self.launch(key.clone(), id, ttl, compute());
                if let Some(weak) = flight.downgrade() {
                    registry.flights.insert(key, Registered { id, flight: weak });
                }
                flight
            }
        };

        flight.await
    }

    fn launch<Fut>(&self, key: String, id: u64, ttl: Duration, computation: Fut) -> Flight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let guard = FlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            key,
            id,
        };

        async move {
            let result = computation.await;
            if let Ok(value) = &result {
                store.set_with_ttl(guard.key.clone(), value.clone(), ttl);
            }
            drop(guard);
            result
        }
        .boxed()
        .shared()
    }

    // == Invalidation ==
    /// Drops the cached value for `name` + `args`. Returns whether one existed.
    pub fn invalidate(&self, name: &str, args: &Value) -> bool {
        self.store.delete(&build_key(name, args))
    }

    /// Drops every cached value produced under `name`. Returns the count.
    pub fn invalidate_all(&self, name: &str) -> usize {
        let pattern = format!("{}{}*", name, KEY_SEPARATOR);
        self.store
            .keys(&pattern)
            .iter()
            .filter(|key| self.store.delete(key.as_str()))
            .count()
    }

    /// Number of computations currently running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().flights.len()
    }
}

/// Unregisters a flight once its computation finishes, fails, panics or is
/// dropped by its last caller.
struct FlightGuard<V, E> {
    in_flight: FlightMap<V, E>,
    key: String,
    id: u64,
}

impl<V, E> Drop for FlightGuard<V, E> {
    fn drop(&mut self) {
        let mut registry = self.in_flight.lock();
        // A newer flight may already own the key
        if registry.flights.get(&self.key).is_some_and(|r| r.id == self.id) {
            registry.flights.remove(&self.key);
        }
    }
}
