//! Error types crossing the Lookaside public boundary.
//!
//! Only two conditions ever reach a caller of the tiered cache: the backing
//! store authoritatively has no such entity, or the backing store failed.
//! Every tier-internal fault (distributed cache unreachable, local
//! population failure, corrupt payload) is absorbed and degrades to the
//! next tier.

use thiserror::Error;

use crate::key::EntityKey;

/// Errors returned by a tiered lookup.
///
/// `Clone` so a single resolution result can be handed to every coalesced
/// waiter.
///
/// # Example
///
/// ```
/// use lookaside_core::{EntityKey, LookupError};
///
/// let err = LookupError::NotFound { key: EntityKey::numeric("user", 42) };
/// assert!(err.is_not_found());
/// assert_eq!(err.to_string(), "entity not found: user:42");
/// ```
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// The backing store authoritatively has no entity for this key.
    /// Never cached as a negative result, never retried.
    #[error("entity not found: {key}")]
    NotFound { key: EntityKey },

    /// The backing store failed for a reason other than absence.
    /// Propagated verbatim to every waiter of the in-flight resolution.
    #[error("backing store error: {reason}")]
    Upstream { reason: String },
}

impl LookupError {
    /// Creates a new not-found error for the given key.
    pub fn not_found(key: EntityKey) -> Self {
        Self::NotFound { key }
    }

    /// Creates a new upstream failure.
    pub fn upstream(reason: impl Into<String>) -> Self {
        Self::Upstream {
            reason: reason.into(),
        }
    }

    /// Returns true if the backing store reported authoritative absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
