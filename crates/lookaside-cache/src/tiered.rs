//! Tiered cache orchestrator.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use lookaside_core::{EntityKey, LookupError, ValueCodec};

use crate::config::TieredCacheConfig;
use crate::flight::FlightGroup;
use crate::local::LocalCache;
use crate::metrics::TierMetrics;
use crate::source::{EntityStore, RemoteCache};
use crate::writeback::{WritebackHandle, WritebackWorker};

/// Read-through lookup cache composed of three tiers.
///
/// Lookup order: local TTL tier, distributed tier, backing store. A local
/// hit returns immediately and bypasses coalescing; everything below the
/// local tier runs inside a per-key in-flight resolution shared by all
/// concurrent callers. A backing-store hit schedules write-back population
/// of the faster tiers without blocking the return.
///
/// Construct one instance at process start and share it across callers;
/// the local tier and the write-back worker live as long as the cache.
/// Call [`shutdown`](TieredCache::shutdown) on teardown to stop the
/// worker.
pub struct TieredCache<V> {
    local: LocalCache<V>,
    remote: Arc<dyn RemoteCache>,
    store: Arc<dyn EntityStore<V>>,
    codec: Arc<dyn ValueCodec<V>>,
    flight: FlightGroup<Arc<V>>,
    writeback: Arc<WritebackHandle<V>>,
    metrics: TierMetrics,
}

impl<V> Clone for TieredCache<V> {
    fn clone(&self) -> Self {
        Self {
            local: self.local.clone(),
            remote: Arc::clone(&self.remote),
            store: Arc::clone(&self.store),
            codec: Arc::clone(&self.codec),
            flight: self.flight.clone(),
            writeback: Arc::clone(&self.writeback),
            metrics: self.metrics.clone(),
        }
    }
}

impl<V> TieredCache<V>
where
    V: Send + Sync + 'static,
{
    /// Creates a new tiered cache over the given adapters and starts its
    /// write-back worker.
    pub fn new(
        config: TieredCacheConfig,
        store: Arc<dyn EntityStore<V>>,
        remote: Arc<dyn RemoteCache>,
        codec: Arc<dyn ValueCodec<V>>,
    ) -> Self {
        let metrics = TierMetrics::new();
        let local = LocalCache::new(config.local_capacity(), metrics.clone());

        let writeback = WritebackWorker::new(
            local.clone(),
            Arc::clone(&remote),
            Arc::clone(&codec),
            config.local_ttl(),
            config.remote_ttl(),
            metrics.clone(),
        )
        .start(config.writeback_capacity());

        Self {
            local,
            remote,
            store,
            codec,
            flight: FlightGroup::new(metrics.clone()),
            writeback: Arc::new(writeback),
            metrics,
        }
    }

    /// Looks up the entity for the key.
    ///
    /// 1. Local tier hit: returned immediately.
    /// 2. Miss: joins the per-key in-flight resolution, which consults the
    ///    distributed tier (a corrupt payload or a fault there falls
    ///    through) and then the backing store. A store hit enqueues
    ///    write-back population and returns.
    ///
    /// A caller right after a store-resolved lookup may still miss locally
    /// until the write-back lands; that staleness window is part of the
    /// contract.
    ///
    /// # Errors
    ///
    /// - `LookupError::NotFound` - the store authoritatively has no such
    ///   key; never cached.
    /// - `LookupError::Upstream` - the store failed; shared verbatim by
    ///   every coalesced caller, retried fresh on the next call.
    pub async fn get(&self, key: &EntityKey) -> Result<Arc<V>, LookupError> {
        let start = Instant::now();

        if let Some(value) = self.local.get(key).await {
            self.metrics.record_lookup_duration("local", start.elapsed());
            return Ok(value);
        }

        let resolution = {
            let key = key.clone();
            let remote = Arc::clone(&self.remote);
            let store = Arc::clone(&self.store);
            let codec = Arc::clone(&self.codec);
            let writeback = Arc::clone(&self.writeback);
            let metrics = self.metrics.clone();
            async move { resolve_uncached(key, remote, store, codec, writeback, metrics).await }
        };

        let result = self.flight.join(key.clone(), move || resolution).await;

        let outcome = match &result {
            Ok(_) => "resolved",
            Err(_) => "error",
        };
        self.metrics.record_lookup_duration(outcome, start.elapsed());

        result
    }

    /// Stops the write-back worker. Pending population jobs are dropped.
    pub fn shutdown(&self) {
        self.writeback.stop();
    }

    /// Returns the tier metrics recorder.
    pub fn metrics(&self) -> &TierMetrics {
        &self.metrics
    }

    /// Returns the approximate number of entries in the local tier.
    pub fn local_entry_count(&self) -> u64 {
        self.local.entry_count()
    }
}

/// Resolution chain below the local tier: distributed lookup, then the
/// backing store, then write-back scheduling. Runs inside the flight
/// group's detached task.
async fn resolve_uncached<V>(
    key: EntityKey,
    remote: Arc<dyn RemoteCache>,
    store: Arc<dyn EntityStore<V>>,
    codec: Arc<dyn ValueCodec<V>>,
    writeback: Arc<WritebackHandle<V>>,
    metrics: TierMetrics,
) -> Result<Arc<V>, LookupError>
where
    V: Send + Sync + 'static,
{
    match remote.get(&key).await {
        Ok(Some(bytes)) => match codec.decode(&bytes) {
            Ok(value) => {
                metrics.record_remote_hit();
                debug!(key = %key, "distributed tier hit");
                return Ok(Arc::new(value));
            }
            Err(e) => {
                // Payload corrupto: tratarlo como miss. El siguiente
                // write-back exitoso sobrescribe la entrada.
                warn!(key = %key, error = %e, "corrupt distributed payload, treating as miss");
                metrics.record_decode_failure();
            }
        },
        Ok(None) => {
            metrics.record_remote_miss();
        }
        Err(e) => {
            // El cache nunca es un punto unico de fallo para lecturas
            warn!(key = %key, error = %e, "distributed tier unreachable, falling through");
            metrics.record_remote_error();
        }
    }

    let value = Arc::new(store.load(&key).await?);
    metrics.record_store_load();
    debug!(key = %key, store = store.name(), "backing store load");

    writeback.enqueue(key, Arc::clone(&value));

    Ok(value)
}
