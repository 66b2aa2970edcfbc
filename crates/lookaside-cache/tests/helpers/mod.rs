//! Test helpers para lookaside-cache.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod mocks;

pub use assertions::*;
pub use mocks::{MemoryRemote, Profile, ScriptedStore, tiered};

/// Inicializa tracing y el registro de metricas para los tests.
/// Idempotente: el try_init ignora inicializaciones repetidas.
pub fn init_telemetry() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();

    lookaside_cache::register_tier_metrics();
}
