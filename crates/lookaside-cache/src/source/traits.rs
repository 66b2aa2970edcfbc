//! Tier adapter trait definitions.

use std::time::Duration;

use async_trait::async_trait;

use lookaside_core::{EntityKey, LookupError};

use crate::error::RemoteCacheError;

/// The authoritative source of entity values.
///
/// This trait abstracts over whatever persistence the host application uses
/// (SQL, a remote service, a document store) so the cache engine can fetch
/// entities without knowing where they live.
///
/// # Implementors
///
/// The host application supplies the implementation; the engine only ever
/// holds it as `Arc<dyn EntityStore<V>>`.
///
/// # Example
///
/// ```ignore
/// use lookaside_cache::EntityStore;
/// use lookaside_core::{EntityKey, LookupError};
///
/// struct SqlStore;
///
/// #[async_trait]
/// impl EntityStore<Profile> for SqlStore {
///     async fn load(&self, key: &EntityKey) -> Result<Profile, LookupError> {
///         // SELECT ... WHERE id = key.id()
///     }
/// }
/// ```
#[async_trait]
pub trait EntityStore<V>: Send + Sync {
    /// Loads the entity for the given key from the authoritative source.
    ///
    /// # Errors
    ///
    /// - `LookupError::NotFound` if the store authoritatively has no such
    ///   key. Propagated to the caller and never cached.
    /// - `LookupError::Upstream` for any other failure. Propagated verbatim
    ///   to every coalesced waiter.
    async fn load(&self, key: &EntityKey) -> Result<V, LookupError>;

    /// Returns the name of this store, used for logging.
    fn name(&self) -> &str {
        "store"
    }
}

/// The shared distributed cache tier.
///
/// Stores the encoded byte form of values and enforces expiry server-side.
/// Implementations are assumed safe for concurrent use.
///
/// Not-found (`Ok(None)`) and unreachable (`Err`) are distinct outcomes:
/// both fall through to the backing store, but only the latter is a fault.
#[async_trait]
pub trait RemoteCache: Send + Sync {
    /// Fetches the encoded value for the key, if present.
    async fn get(&self, key: &EntityKey) -> Result<Option<Vec<u8>>, RemoteCacheError>;

    /// Stores the encoded value under the key with the given expiry.
    async fn set(
        &self,
        key: &EntityKey,
        bytes: Vec<u8>,
        ttl: Duration,
    ) -> Result<(), RemoteCacheError>;

    /// Returns the name of this cache, used for logging.
    fn name(&self) -> &str {
        "remote"
    }
}
