//! In-memory cache backend
//!
//! Provides a process-local [`CacheBackend`] built on `moka`'s future
//! cache, with per-entry expiry so each `set` can carry its own
//! lifetime. Suitable for single-process deployments and tests; swap in
//! another [`CacheBackend`] implementation for anything shared.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BoxError;
use crate::store::{CacheBackend, Ttl};

/// Configuration for the in-memory backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries held in memory
    pub max_capacity: u64,
    /// Lifetime applied when a `set` uses [`Ttl::Default`]
    pub default_ttl: Duration,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: Duration::from_secs(3600),
        }
    }
}

/// A cached value together with its resolved lifetime
#[derive(Clone)]
struct StoredEntry {
    value: Value,
    /// `None` means the entry never expires
    lifetime: Option<Duration>,
}

/// Expiry policy that reads each entry's own lifetime
struct PerEntryExpiry;

impl Expiry<String, StoredEntry> for PerEntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        entry.lifetime
    }
}

/// In-memory TTL-aware backend over a `moka` future cache
pub struct MemoryBackend {
    cache: Cache<String, StoredEntry>,
    config: MemoryCacheConfig,
}

impl MemoryBackend {
    /// Create a backend with the given configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity and default-lifetime settings
    ///
    /// # Returns
    ///
    /// Returns an empty backend ready to share behind an `Arc`
    ///
    /// # Examples
    ///
    /// ```
    /// use solr_cache::{MemoryBackend, MemoryCacheConfig};
    ///
    /// let backend = MemoryBackend::new(MemoryCacheConfig::default());
    /// assert_eq!(backend.entry_count(), 0);
    /// ```
    pub fn new(config: MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryExpiry)
            .build();

        Self { cache, config }
    }

    /// Number of entries currently held (approximate until pending
    /// maintenance runs)
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// The backend configuration
    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    fn resolve_lifetime(&self, ttl: Ttl) -> Option<Duration> {
        match ttl {
            Ttl::Default => Some(self.config.default_ttl),
            Ttl::Forever => None,
            Ttl::Seconds(secs) => Some(Duration::from_secs(secs)),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(MemoryCacheConfig::default())
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, BoxError> {
        Ok(self.cache.get(key).await.map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Ttl) -> Result<(), BoxError> {
        let entry = StoredEntry {
            value,
            lifetime: self.resolve_lifetime(ttl),
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), BoxError> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), BoxError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}
