//! Entity key generation and normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Key unica para una entidad logica a traves de todos los tiers.
/// Normaliza el namespace a lowercase para consistencia.
///
/// The rendered form (`namespace:id`) is the serialization used by every
/// tier, so the same logical entity always resolves to the same slot in the
/// local cache, the distributed cache, and the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKey {
    namespace: String,
    id: String,
}

impl EntityKey {
    /// Crea una nueva key normalizando el namespace a lowercase.
    ///
    /// # Examples
    ///
    /// ```
    /// use lookaside_core::EntityKey;
    ///
    /// let key = EntityKey::new("User", "42");
    /// assert_eq!(key.namespace(), "user");
    /// assert_eq!(key.id(), "42");
    /// assert_eq!(key.to_string(), "user:42");
    /// ```
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into().to_lowercase(),
            id: id.into(),
        }
    }

    /// Crea una key para una entidad con id numerico.
    ///
    /// # Examples
    ///
    /// ```
    /// use lookaside_core::EntityKey;
    ///
    /// let key = EntityKey::numeric("user", 42);
    /// assert_eq!(key.to_string(), "user:42");
    /// ```
    pub fn numeric(namespace: impl Into<String>, id: u64) -> Self {
        Self::new(namespace, id.to_string())
    }

    /// Retorna el namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Retorna el id de la entidad.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.id)
    }
}
