//! Error types for the distributed cache tier.

use thiserror::Error;

/// Errors reported by a [`RemoteCache`](crate::source::RemoteCache) adapter.
///
/// These never cross the engine's public boundary: a remote fault is logged
/// and the lookup falls through to the backing store, so the cache is never
/// a single point of failure for read availability.
#[derive(Debug, Error)]
pub enum RemoteCacheError {
    /// The distributed cache is not reachable.
    #[error("remote cache unavailable: {reason}")]
    Unavailable { reason: String },

    /// The distributed cache rejected or failed the operation.
    #[error("remote cache error: {0}")]
    Backend(String),

    /// A timeout occurred while waiting for the distributed cache.
    #[error("remote cache timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl RemoteCacheError {
    /// Creates a new unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a new backend error.
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}
