//! Per-key request coalescing.
//!
//! For a given key, at most one resolution chain (distributed lookup plus
//! backing-store fetch) runs at a time; every concurrent caller for that
//! key receives a clone of the same result. The resolution runs in a
//! detached task, so a caller that cancels its own wait never aborts the
//! shared resolution other waiters are attached to.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use lookaside_core::{EntityKey, LookupError};

use crate::metrics::TierMetrics;

type FlightResult<T> = Result<T, LookupError>;
type Marker<T> = watch::Receiver<Option<FlightResult<T>>>;

/// Removes the in-flight marker when the resolution task finishes,
/// including the panic path. A stale marker would pin every later caller
/// to a channel that can no longer produce a result.
struct MarkerGuard<T> {
    inflight: Arc<Mutex<HashMap<EntityKey, Marker<T>>>>,
    key: EntityKey,
}

impl<T> Drop for MarkerGuard<T> {
    fn drop(&mut self) {
        self.inflight.lock().remove(&self.key);
    }
}

/// Coalesces concurrent lookups of the same key into one resolution.
///
/// The marker for a key exists exactly while its resolution is in progress:
/// created when the first caller arrives, removed once the result has been
/// published to every attached waiter. A caller arriving after removal
/// starts a fresh resolution - immediately after completion that can yield
/// a second resolution racing the first's write-back, which the tier
/// caches make rare and is never a correctness violation.
pub struct FlightGroup<T> {
    inflight: Arc<Mutex<HashMap<EntityKey, Marker<T>>>>,
    metrics: TierMetrics,
}

impl<T> Clone for FlightGroup<T> {
    fn clone(&self) -> Self {
        Self {
            inflight: Arc::clone(&self.inflight),
            metrics: self.metrics.clone(),
        }
    }
}

impl<T> FlightGroup<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty flight group.
    pub fn new(metrics: TierMetrics) -> Self {
        Self {
            inflight: Arc::new(Mutex::new(HashMap::new())),
            metrics,
        }
    }

    /// Runs `resolve` for the key, or attaches to the resolution already in
    /// flight for it. All callers receive the same result, error included;
    /// on failure the marker is still cleared so the next call retries
    /// fresh.
    pub async fn join<F, Fut>(&self, key: EntityKey, resolve: F) -> FlightResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FlightResult<T>> + Send + 'static,
    {
        // Creation and attachment are atomic with respect to concurrent
        // joins on the same key.
        let (mut rx, lead_tx) = {
            let mut inflight = self.inflight.lock();
            match inflight.get(&key) {
                Some(rx) => (rx.clone(), None),
                None => {
                    let (tx, rx) = watch::channel(None);
                    inflight.insert(key.clone(), rx.clone());
                    (rx, Some(tx))
                }
            }
        };

        match lead_tx {
            Some(tx) => {
                let fut = resolve();
                let guard = MarkerGuard {
                    inflight: Arc::clone(&self.inflight),
                    key: key.clone(),
                };
                tokio::spawn(async move {
                    let _guard = guard;
                    let result = fut.await;
                    // Waiters hold the receiver, so the published value
                    // outlives the marker removal that follows.
                    let _ = tx.send(Some(result));
                });
            }
            None => {
                self.metrics.record_flight_shared();
                debug!(key = %key, "attached to in-flight resolution");
            }
        }

        loop {
            {
                let value = rx.borrow_and_update();
                if let Some(result) = value.as_ref() {
                    return result.clone();
                }
            }
            if rx.changed().await.is_err() {
                // The resolution task died without publishing (panic). The
                // marker guard already cleared the key, so the next caller
                // starts fresh.
                return Err(LookupError::upstream("in-flight resolution aborted"));
            }
        }
    }

    /// Returns the number of resolutions currently in flight.
    pub fn in_flight(&self) -> usize {
        self.inflight.lock().len()
    }
}
