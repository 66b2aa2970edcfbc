//! # Lookaside Cache Engine
//!
//! Multi-tier read-through lookup cache for keyed entities.
//!
//! This crate composes three tiers - a process-local TTL cache, a shared
//! distributed cache reached through an adapter, and the authoritative
//! backing store - into a single `get` operation. Concurrent lookups of the
//! same key collapse into one in-flight resolution, and a backing-store hit
//! repopulates the faster tiers asynchronously.
//!
//! ## Features
//!
//! - Process-wide local tier with per-entry TTL (Moka)
//! - Per-key request coalescing decoupled from caller cancellation
//! - Fire-and-forget write-back population through a bounded queue
//! - Distributed tier and backing store injected as async traits
//! - Tier faults absorbed and logged, never propagated
//!
//! ## Example
//!
//! ```ignore
//! use lookaside_cache::{TieredCache, TieredCacheConfig};
//! use lookaside_core::{EntityKey, JsonCodec};
//!
//! let config = TieredCacheConfig::default();
//! let cache = TieredCache::new(config, store, remote, Arc::new(JsonCodec));
//!
//! let profile = cache.get(&EntityKey::numeric("user", 42)).await?;
//! ```

pub mod config;
pub mod error;
pub mod flight;
pub mod local;
pub mod metrics;
pub mod source;
pub mod tiered;
pub mod writeback;

// Re-exports
pub use config::TieredCacheConfig;
pub use error::RemoteCacheError;
pub use flight::FlightGroup;
pub use local::LocalCache;
pub use metrics::{TierMetrics, register_tier_metrics};
pub use source::{EntityStore, RemoteCache};
pub use tiered::TieredCache;
pub use writeback::WritebackHandle;

// Re-export lookaside_core for consumers
pub use lookaside_core;
