//! Local TTL tier using Moka.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache;

use lookaside_core::EntityKey;

use crate::metrics::TierMetrics;

/// A decoded value plus the TTL it was stored with. The expiry policy reads
/// the TTL back out, which is what gives the cache per-entry deadlines.
struct TtlEntry<V> {
    value: Arc<V>,
    ttl: Duration,
}

impl<V> Clone for TtlEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            ttl: self.ttl,
        }
    }
}

/// Expiry policy: cada entry expira segun el TTL con el que fue insertada.
/// Un overwrite resetea el deadline.
struct PerEntryTtl;

impl<V> Expiry<EntityKey, TtlEntry<V>> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &EntityKey,
        value: &TtlEntry<V>,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &EntityKey,
        value: &TtlEntry<V>,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Tier local de corta vida usando Moka.
/// Thread-safe y async-friendly; una sola instancia por proceso, compartida
/// por todos los lookups.
///
/// A `get` never returns an entry past its deadline - Moka checks expiry on
/// read. Population failures stay inside the tier: inserts are infallible
/// and capacity evictions are only recorded for observability.
pub struct LocalCache<V> {
    inner: Cache<EntityKey, TtlEntry<V>>,
    metrics: TierMetrics,
}

impl<V> Clone for LocalCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<V> LocalCache<V>
where
    V: Send + Sync + 'static,
{
    /// Crea un nuevo tier local con la capacidad dada.
    pub fn new(max_capacity: u64, metrics: TierMetrics) -> Self {
        // Configurar listener para evictions
        let eviction_metrics = metrics.clone();
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .eviction_listener(move |_key, _value, cause| {
                let reason = match cause {
                    moka::notification::RemovalCause::Expired => "ttl",
                    moka::notification::RemovalCause::Size => "capacity",
                    moka::notification::RemovalCause::Explicit => "manual",
                    moka::notification::RemovalCause::Replaced => "replaced",
                };
                eviction_metrics.record_local_eviction(reason);
            })
            .build();

        Self { inner, metrics }
    }

    /// Obtiene un valor del tier si existe y no ha expirado.
    pub async fn get(&self, key: &EntityKey) -> Option<Arc<V>> {
        let result = self.inner.get(key).await;

        if result.is_some() {
            self.metrics.record_local_hit();
        } else {
            self.metrics.record_local_miss();
        }
        self.update_entry_gauge();

        result.map(|entry| entry.value)
    }

    /// Inserta un valor con el TTL dado.
    /// Sobrescribe cualquier entry existente y resetea su deadline.
    pub async fn insert(&self, key: EntityKey, value: Arc<V>, ttl: Duration) {
        self.inner.insert(key, TtlEntry { value, ttl }).await;
        self.update_entry_gauge();
    }

    /// Invalida una entrada especifica.
    pub async fn invalidate(&self, key: &EntityKey) {
        self.inner.invalidate(key).await;
    }

    /// Retorna el numero aproximado de entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Actualiza el gauge de entry count.
    fn update_entry_gauge(&self) {
        self.metrics.update_local_entries(self.inner.entry_count());
    }

    /// Sincroniza el tier (para tests principalmente).
    /// Fuerza la limpieza de entries expiradas.
    #[cfg(test)]
    pub(crate) async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}
