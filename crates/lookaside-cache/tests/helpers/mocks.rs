//! Mock adapters for integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use lookaside_cache::{EntityStore, RemoteCache, RemoteCacheError};
use lookaside_core::{EntityKey, LookupError};

/// Domain payload used across the integration tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    pub name: String,
    pub image: String,
}

impl Profile {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            image: format!("avatars/{id}.png"),
        }
    }

    pub fn key(&self) -> EntityKey {
        EntityKey::numeric("user", self.id)
    }
}

/// Backing store mock: serves scripted profiles, counts loads, and can be
/// switched into failure mode or given artificial latency.
pub struct ScriptedStore {
    profiles: Mutex<HashMap<EntityKey, Profile>>,
    delay: Duration,
    loads: AtomicU32,
    failing: AtomicBool,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self {
            profiles: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
            loads: AtomicU32::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn insert(&self, profile: Profile) {
        self.profiles.lock().insert(profile.key(), profile);
    }

    /// Numero de cargas ejecutadas contra el store.
    pub fn loads(&self) -> u32 {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for ScriptedStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntityStore<Profile> for ScriptedStore {
    async fn load(&self, key: &EntityKey) -> Result<Profile, LookupError> {
        self.loads.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(LookupError::upstream("backing store offline"));
        }

        self.profiles
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::not_found(key.clone()))
    }

    fn name(&self) -> &str {
        "scripted-store"
    }
}

/// Distributed cache mock: in-memory byte store with counters and an
/// unreachable mode.
pub struct MemoryRemote {
    entries: Mutex<HashMap<EntityKey, Vec<u8>>>,
    gets: AtomicU32,
    sets: AtomicU32,
    unreachable: AtomicBool,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            gets: AtomicU32::new(0),
            sets: AtomicU32::new(0),
            unreachable: AtomicBool::new(false),
        }
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Siembra una entrada ya codificada.
    pub fn seed(&self, key: EntityKey, bytes: Vec<u8>) {
        self.entries.lock().insert(key, bytes);
    }

    pub fn bytes_for(&self, key: &EntityKey) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }

    pub fn gets(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> u32 {
        self.sets.load(Ordering::SeqCst)
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteCache for MemoryRemote {
    async fn get(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, RemoteCacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteCacheError::unavailable("connection refused"));
        }
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(
        &self,
        key: &EntityKey,
        bytes: Vec<u8>,
        _ttl: Duration,
    ) -> Result<(), RemoteCacheError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(RemoteCacheError::unavailable("connection refused"));
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().insert(key.clone(), bytes);
        Ok(())
    }

    fn name(&self) -> &str {
        "memory-remote"
    }
}

/// Construye un cache con los mocks dados y el codec JSON.
pub fn tiered(
    store: &Arc<ScriptedStore>,
    remote: &Arc<MemoryRemote>,
) -> lookaside_cache::TieredCache<Profile> {
    use lookaside_cache::TieredCacheConfig;
    use lookaside_core::JsonCodec;

    lookaside_cache::TieredCache::new(
        TieredCacheConfig::default(),
        Arc::clone(store) as Arc<dyn EntityStore<Profile>>,
        Arc::clone(remote) as Arc<dyn RemoteCache>,
        Arc::new(JsonCodec),
    )
}
