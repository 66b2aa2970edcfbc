//! Tiered cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the tiered cache.
///
/// The local TTL stays materially shorter than the remote TTL so a stale
/// local entry self-heals quickly while the distributed tier absorbs most
/// of the origin load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TieredCacheConfig {
    /// Time-to-live for local tier entries.
    #[serde(default = "default_local_ttl", with = "secs_serde")]
    local_ttl: Duration,

    /// Time-to-live for distributed tier entries.
    #[serde(default = "default_remote_ttl", with = "secs_serde")]
    remote_ttl: Duration,

    /// Maximum number of entries in the local tier.
    #[serde(default = "default_local_capacity")]
    local_capacity: u64,

    /// Capacity of the write-back queue. Jobs beyond this are dropped
    /// (and counted); population is best-effort.
    #[serde(default = "default_writeback_capacity")]
    writeback_capacity: usize,
}

fn default_local_ttl() -> Duration {
    Duration::from_secs(10)
}

fn default_remote_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_local_capacity() -> u64 {
    10_000
}

fn default_writeback_capacity() -> usize {
    256
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            local_ttl: default_local_ttl(),
            remote_ttl: default_remote_ttl(),
            local_capacity: default_local_capacity(),
            writeback_capacity: default_writeback_capacity(),
        }
    }
}

impl TieredCacheConfig {
    /// Creates a new builder for TieredCacheConfig.
    pub fn builder() -> TieredCacheConfigBuilder {
        TieredCacheConfigBuilder::default()
    }

    /// Returns the local tier TTL.
    pub fn local_ttl(&self) -> Duration {
        self.local_ttl
    }

    /// Returns the distributed tier TTL.
    pub fn remote_ttl(&self) -> Duration {
        self.remote_ttl
    }

    /// Returns the local tier capacity.
    pub fn local_capacity(&self) -> u64 {
        self.local_capacity
    }

    /// Returns the write-back queue capacity.
    pub fn writeback_capacity(&self) -> usize {
        self.writeback_capacity
    }
}

/// Builder for TieredCacheConfig.
#[derive(Debug, Default)]
pub struct TieredCacheConfigBuilder {
    local_ttl: Option<Duration>,
    remote_ttl: Option<Duration>,
    local_capacity: Option<u64>,
    writeback_capacity: Option<usize>,
}

impl TieredCacheConfigBuilder {
    /// Sets the local tier TTL.
    pub fn local_ttl(mut self, ttl: Duration) -> Self {
        self.local_ttl = Some(ttl);
        self
    }

    /// Sets the distributed tier TTL.
    pub fn remote_ttl(mut self, ttl: Duration) -> Self {
        self.remote_ttl = Some(ttl);
        self
    }

    /// Sets the local tier capacity.
    pub fn local_capacity(mut self, capacity: u64) -> Self {
        self.local_capacity = Some(capacity);
        self
    }

    /// Sets the write-back queue capacity.
    pub fn writeback_capacity(mut self, capacity: usize) -> Self {
        self.writeback_capacity = Some(capacity);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the local TTL is not shorter than the remote TTL,
    /// or if either TTL is zero.
    pub fn build(self) -> Result<TieredCacheConfig, &'static str> {
        let local_ttl = self.local_ttl.unwrap_or_else(default_local_ttl);
        let remote_ttl = self.remote_ttl.unwrap_or_else(default_remote_ttl);

        if local_ttl.is_zero() || remote_ttl.is_zero() {
            return Err("ttl must be non-zero");
        }
        if local_ttl >= remote_ttl {
            return Err("local_ttl must be shorter than remote_ttl");
        }
        if self.writeback_capacity == Some(0) {
            return Err("writeback_capacity must be non-zero");
        }

        Ok(TieredCacheConfig {
            local_ttl,
            remote_ttl,
            local_capacity: self.local_capacity.unwrap_or_else(default_local_capacity),
            writeback_capacity: self
                .writeback_capacity
                .unwrap_or_else(default_writeback_capacity),
        })
    }
}


mod secs_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
