//! Cache configuration.

use std::time::Duration;

/// Configuration for a cache instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries in the cache.
    pub max_capacity: u64,

    /// Time-to-live for cache entries.
    /// `None` keeps entries until they are evicted by capacity.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 64,
            ttl: Some(Duration::from_secs(300)), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Config for fetched documents.
    ///
    /// A TTL of zero seconds means "do not cache"; see [`CacheConfig::is_disabled`].
    pub fn documents(max_capacity: u64, ttl_secs: u64) -> Self {
        Self {
            max_capacity,
            ttl: Some(Duration::from_secs(ttl_secs)),
        }
    }

    /// Set max capacity for cache (builder pattern).
    #[must_use]
    pub fn max_capacity(mut self, max_capacity: u64) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Set time-to-live for cache entries.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Whether this config describes a cache that stores nothing.
    pub fn is_disabled(&self) -> bool {
        self.max_capacity == 0 || self.ttl.is_some_and(|ttl| ttl.is_zero())
    }
}
