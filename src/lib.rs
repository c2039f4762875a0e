//! Transparent query-result caching for Solr-style search clients
//!
//! This crate decorates a query-capable search client with cache-aside
//! behavior: it derives a deterministic key for each query and the
//! backend it targets, serves previously computed results from a
//! backing store when available, and falls through to the live service
//! otherwise. Caching is opt-in per call and never mutates the shared
//! client.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `query`: opaque query values and their canonical string rendering
//! - `keygen`: deterministic SHA-256 cache key derivation
//! - `store`: the `CacheBackend` trait and TTL-normalizing `CacheStore`
//! - `memory`: in-process `moka`-backed backend with per-entry expiry
//! - `client`: the `CachedSolrClient` decorator and its options builder
//! - `error`: error types for cache operations
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use serde_json::{json, Value};
//! use solr_cache::{
//!     BoxError, CachedSolrClient, ConnectionIdentity, MemoryBackend, SolrClient, SolrQuery,
//! };
//!
//! struct HttpSolrClient {
//!     identity: ConnectionIdentity,
//! }
//!
//! #[async_trait]
//! impl SolrClient for HttpSolrClient {
//!     async fn search(&self, query: &SolrQuery) -> Result<Value, BoxError> {
//!         // Issue the real request here
//!         let _ = query.canonical_string();
//!         Ok(json!({"response": {"numFound": 42}}))
//!     }
//!
//!     fn identity(&self) -> &ConnectionIdentity {
//!         &self.identity
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let client = CachedSolrClient::new(
//!     HttpSolrClient {
//!         identity: ConnectionIdentity::new("localhost", 8983, "products", "/solr"),
//!     },
//!     Arc::new(MemoryBackend::default()),
//! );
//!
//! // Transparent passthrough: no cache involved
//! let live = client.search(&SolrQuery::raw("q=*:*")).await.unwrap();
//! assert!(!live.from_cache());
//!
//! // Opt in with a 30 second TTL; the second call is served from cache
//! let cached = client.with_cache(30u64);
//! cached.search(&SolrQuery::raw("q=*:*")).await.unwrap();
//! let hit = cached.search(&SolrQuery::raw("q=*:*")).await.unwrap();
//! assert!(hit.from_cache());
//! # });
//! ```

pub mod client;
pub mod error;
pub mod keygen;
pub mod memory;
pub mod query;
pub mod store;

// Re-export commonly used types
pub use client::{CacheOptions, CachedSolrClient, ConnectionIdentity, SearchOutcome, SolrClient};
pub use error::{BoxError, CacheError, Result};
pub use keygen::cache_key;
pub use memory::{MemoryBackend, MemoryCacheConfig};
pub use query::{QueryBuilder, SolrQuery};
pub use store::{CacheBackend, CacheStore, Ttl};
