//! Tier metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de los tiers.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_tier_metrics() {
    // Describir metricas
    metrics::describe_counter!(
        "lookaside_local_hits_total",
        "Total number of local tier hits"
    );
    metrics::describe_counter!(
        "lookaside_local_misses_total",
        "Total number of local tier misses"
    );
    metrics::describe_counter!(
        "lookaside_remote_hits_total",
        "Total number of distributed tier hits"
    );
    metrics::describe_counter!(
        "lookaside_remote_misses_total",
        "Total number of distributed tier misses"
    );
    metrics::describe_counter!(
        "lookaside_remote_errors_total",
        "Total number of distributed tier faults absorbed"
    );
    metrics::describe_counter!(
        "lookaside_store_loads_total",
        "Total number of backing store loads"
    );
    metrics::describe_counter!(
        "lookaside_decode_failures_total",
        "Total number of corrupt distributed payloads treated as misses"
    );
    metrics::describe_counter!(
        "lookaside_writeback_failures_total",
        "Total number of failed write-back population jobs"
    );
    metrics::describe_counter!(
        "lookaside_flight_shared_total",
        "Total number of lookups that attached to an in-flight resolution"
    );
    metrics::describe_counter!(
        "lookaside_local_evictions_total",
        "Total number of local tier evictions"
    );
    metrics::describe_gauge!(
        "lookaside_local_entries",
        "Current number of entries in the local tier"
    );
    metrics::describe_histogram!(
        "lookaside_lookup_seconds",
        "Time spent resolving a tiered lookup"
    );
}

/// Recorder de metricas de los tiers.
/// Usa atomic counters internos para maximo rendimiento.
#[derive(Debug, Clone)]
pub struct TierMetrics {
    local_hits: Arc<AtomicU64>,
    local_misses: Arc<AtomicU64>,
    remote_hits: Arc<AtomicU64>,
    store_loads: Arc<AtomicU64>,
    writeback_failures: Arc<AtomicU64>,
    flight_shared: Arc<AtomicU64>,
}

impl TierMetrics {
    pub fn new() -> Self {
        Self {
            local_hits: Arc::new(AtomicU64::new(0)),
            local_misses: Arc::new(AtomicU64::new(0)),
            remote_hits: Arc::new(AtomicU64::new(0)),
            store_loads: Arc::new(AtomicU64::new(0)),
            writeback_failures: Arc::new(AtomicU64::new(0)),
            flight_shared: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un hit del tier local
    pub fn record_local_hit(&self) {
        self.local_hits.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_local_hits_total").increment(1);
    }

    /// Registra un miss del tier local
    pub fn record_local_miss(&self) {
        self.local_misses.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_local_misses_total").increment(1);
    }

    /// Registra un hit del tier distribuido
    pub fn record_remote_hit(&self) {
        self.remote_hits.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_remote_hits_total").increment(1);
    }

    /// Registra un miss del tier distribuido
    pub fn record_remote_miss(&self) {
        counter!("lookaside_remote_misses_total").increment(1);
    }

    /// Registra un fallo absorbido del tier distribuido
    pub fn record_remote_error(&self) {
        counter!("lookaside_remote_errors_total").increment(1);
    }

    /// Registra una carga del backing store
    pub fn record_store_load(&self) {
        self.store_loads.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_store_loads_total").increment(1);
    }

    /// Registra un payload corrupto tratado como miss
    pub fn record_decode_failure(&self) {
        counter!("lookaside_decode_failures_total").increment(1);
    }

    /// Registra un fallo de write-back
    pub fn record_writeback_failure(&self) {
        self.writeback_failures.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_writeback_failures_total").increment(1);
    }

    /// Registra un lookup que se adjunto a una resolucion en vuelo
    pub fn record_flight_shared(&self) {
        self.flight_shared.fetch_add(1, Ordering::Relaxed);
        counter!("lookaside_flight_shared_total").increment(1);
    }

    /// Registra una eviction del tier local
    pub fn record_local_eviction(&self, reason: &str) {
        counter!("lookaside_local_evictions_total", "reason" => reason.to_string()).increment(1);
    }

    /// Actualiza el gauge de entries locales
    pub fn update_local_entries(&self, count: u64) {
        gauge!("lookaside_local_entries").set(count as f64);
    }

    /// Registra la duracion de un lookup
    pub fn record_lookup_duration(&self, outcome: &str, duration: Duration) {
        histogram!(
            "lookaside_lookup_seconds",
            "outcome" => outcome.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Calcula el hit rate del tier local (para logging/debugging)
    pub fn local_hit_rate(&self) -> f64 {
        let hits = self.local_hits.load(Ordering::Relaxed) as f64;
        let misses = self.local_misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits locales
    pub fn local_hits(&self) -> u64 {
        self.local_hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses locales
    pub fn local_misses(&self) -> u64 {
        self.local_misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de hits del tier distribuido
    pub fn remote_hits(&self) -> u64 {
        self.remote_hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de cargas del backing store
    pub fn store_loads(&self) -> u64 {
        self.store_loads.load(Ordering::Relaxed)
    }

    /// Retorna el numero de write-backs fallidos
    pub fn writeback_failures(&self) -> u64 {
        self.writeback_failures.load(Ordering::Relaxed)
    }

    /// Retorna el numero de lookups que compartieron una resolucion
    pub fn flight_shared(&self) -> u64 {
        self.flight_shared.load(Ordering::Relaxed)
    }
}

impl Default for TierMetrics {
    fn default() -> Self {
        Self::new()
    }
}
