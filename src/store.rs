//! Cache store abstraction
//!
//! The decorator talks to an injected key/value backend through the
//! [`CacheBackend`] trait and the thin [`CacheStore`] wrapper around it.
//! The wrapper owns TTL sentinel normalization and maps backend failures
//! into [`CacheError::Store`]; it never retries and never downgrades a
//! failure to a miss. Expiry and eviction policy belong entirely to the
//! backend.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BoxError, CacheError, Result};

/// Entry lifetime passed to [`CacheBackend::set`].
///
/// `Seconds(0)` is remapped to `Forever` by [`CacheStore::set`] before
/// it reaches the backend: a zero TTL means "never expire", not "expire
/// immediately".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ttl {
    /// Use the backend's configured default lifetime
    #[default]
    Default,
    /// The entry never expires
    Forever,
    /// Expire after the given number of seconds
    Seconds(u64),
}

impl From<u64> for Ttl {
    fn from(secs: u64) -> Self {
        Self::Seconds(secs)
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Forever => write!(f, "forever"),
            Self::Seconds(secs) => write!(f, "{}s", secs),
        }
    }
}

/// A TTL-aware key/value backend.
///
/// Implementations must tolerate concurrent independent operations; the
/// store is shared by reference across all derived client views.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Look up a cached value. `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> std::result::Result<Option<Value>, BoxError>;

    /// Store a value under a key with the given lifetime
    async fn set(&self, key: &str, value: Value, ttl: Ttl)
        -> std::result::Result<(), BoxError>;

    /// Remove a single entry
    async fn delete(&self, key: &str) -> std::result::Result<(), BoxError>;

    /// Remove all entries
    async fn clear(&self) -> std::result::Result<(), BoxError>;
}

/// Thin wrapper over a shared [`CacheBackend`].
///
/// Cloning is cheap; clones share the same backend instance.
#[derive(Clone)]
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
}

impl CacheStore {
    /// Create a store over the given backend
    ///
    /// # Arguments
    ///
    /// * `backend` - The key/value backend all operations delegate to
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self { backend }
    }

    /// Look up a cached value.
    ///
    /// # Arguments
    ///
    /// * `key` - The store key to look up
    ///
    /// # Returns
    ///
    /// Returns the cached value, or `None` on a miss
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Store` if the backend lookup fails. A failed
    /// lookup is never reported as a miss.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let found = self
            .backend
            .get(key)
            .await
            .map_err(|e| CacheError::store("get", e))?;
        debug!(key, hit = found.is_some(), "cache store get");
        Ok(found)
    }

    /// Store a value under a key.
    ///
    /// # Arguments
    ///
    /// * `key` - The store key to write under
    /// * `value` - The value to cache
    /// * `ttl` - The entry lifetime; `Seconds(0)` is remapped to
    ///   `Forever` before delegation, all other values pass through
    ///   unchanged
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Store` if the backend write fails
    pub async fn set(&self, key: &str, value: Value, ttl: Ttl) -> Result<()> {
        let ttl = match ttl {
            Ttl::Seconds(0) => Ttl::Forever,
            other => other,
        };
        debug!(key, %ttl, "cache store set");
        self.backend
            .set(key, value, ttl)
            .await
            .map_err(|e| CacheError::store("set", e))
    }

    /// Remove a single entry
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!(key, "cache store delete");
        self.backend
            .delete(key)
            .await
            .map_err(|e| CacheError::store("delete", e))
    }

    /// Remove all entries
    pub async fn clear(&self) -> Result<()> {
        debug!("cache store clear");
        self.backend
            .clear()
            .await
            .map_err(|e| CacheError::store("clear", e))
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore").finish_non_exhaustive()
    }
}
