//! Error types for cache operations
//!
//! This module provides the error taxonomy for the caching decorator:
//! backend store failures, live search failures, and serialization
//! errors. Store and search failures carry the underlying error as a
//! source so nothing is lost in translation.

use thiserror::Error;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

/// Boxed error type produced by injected backends and search clients
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for cache operations
///
/// # Examples
///
/// ```
/// use solr_cache::{CacheError, Result};
///
/// fn check(key: &str) -> Result<()> {
///     if key.is_empty() {
///         return Err(CacheError::store("get", "empty key"));
///     }
///     Ok(())
/// }
///
/// assert!(check("").is_err());
/// ```
#[derive(Error, Debug)]
pub enum CacheError {
    /// A backend store operation failed. The original backend error is
    /// preserved as the source; store failures are never retried or
    /// downgraded to cache misses.
    #[error("cache store error during {operation}: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// The live search request failed. Surfaced verbatim to the caller;
    /// nothing is written to the store for a failed search.
    #[error("search request failed: {0}")]
    Search(#[source] BoxError),

    /// A search result could not be decoded into the requested type
    /// (see `SearchOutcome::decode`)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Create a store error for the given operation
    pub fn store<E: Into<BoxError>>(operation: &'static str, source: E) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }

    /// Create a search error from an underlying client failure
    pub fn search<E: Into<BoxError>>(source: E) -> Self {
        Self::Search(source.into())
    }
}
