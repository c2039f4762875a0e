//! Cache-aside client wrapper
//!
//! [`CachedSolrClient`] wraps a query-capable client and a cache store
//! in explicit composition: the underlying client is never mutated or
//! patched. Caching is opt-in per call through [`with_cache`], which
//! returns a new derived view carrying its own [`CacheOptions`]; views
//! share the underlying client and store by reference, so deriving one
//! is cheap and nothing is duplicated.
//!
//! [`with_cache`]: CachedSolrClient::with_cache

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{BoxError, CacheError, Result};
use crate::keygen;
use crate::query::SolrQuery;
use crate::store::{CacheBackend, CacheStore, Ttl};

/// Identity of the backend a client targets.
///
/// Identical queries against different backends must not collide in the
/// cache, so every identity field participates in key derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionIdentity {
    /// Backend hostname
    pub host: String,
    /// Backend port
    pub port: u16,
    /// Core or collection name
    pub core: String,
    /// Request path prefix
    pub path: String,
}

impl ConnectionIdentity {
    /// Create a connection identity
    pub fn new(
        host: impl Into<String>,
        port: u16,
        core: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            core: core.into(),
            path: path.into(),
        }
    }
}

/// Per-call cache options attached to a derived client view.
///
/// Constructed through `Into<CacheOptions>`: a [`Ttl`] or `u64` sets the
/// entry lifetime, a string sets only the custom key (leaving the
/// lifetime at the backend default), and a `(ttl, key)` tuple sets both.
///
/// # Examples
///
/// ```
/// use solr_cache::{CacheOptions, Ttl};
///
/// let by_ttl: CacheOptions = 30u64.into();
/// assert_eq!(by_ttl.ttl, Ttl::Seconds(30));
/// assert!(by_ttl.custom_key.is_none());
///
/// let by_key: CacheOptions = "trending".into();
/// assert_eq!(by_key.ttl, Ttl::Default);
/// assert_eq!(by_key.custom_key.as_deref(), Some("trending"));
///
/// let both: CacheOptions = (40u64, "trending").into();
/// assert_eq!(both.ttl, Ttl::Seconds(40));
/// assert_eq!(both.custom_key.as_deref(), Some("trending"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CacheOptions {
    /// Entry lifetime handed to the store on a write
    pub ttl: Ttl,
    /// Explicit cache key overriding derivation from the query
    pub custom_key: Option<String>,
}

impl From<Ttl> for CacheOptions {
    fn from(ttl: Ttl) -> Self {
        Self {
            ttl,
            custom_key: None,
        }
    }
}

impl From<u64> for CacheOptions {
    fn from(secs: u64) -> Self {
        Ttl::Seconds(secs).into()
    }
}

impl From<&str> for CacheOptions {
    fn from(custom_key: &str) -> Self {
        Self {
            ttl: Ttl::Default,
            custom_key: Some(custom_key.to_string()),
        }
    }
}

impl From<String> for CacheOptions {
    fn from(custom_key: String) -> Self {
        Self {
            ttl: Ttl::Default,
            custom_key: Some(custom_key),
        }
    }
}

impl<T: Into<Ttl>, K: Into<String>> From<(T, K)> for CacheOptions {
    fn from((ttl, custom_key): (T, K)) -> Self {
        Self {
            ttl: ttl.into(),
            custom_key: Some(custom_key.into()),
        }
    }
}

/// A query-capable search client.
///
/// The decorator calls `search` for live queries and reads the
/// connection identity for key derivation; it never interprets the
/// response beyond storing it.
#[async_trait]
pub trait SolrClient: Send + Sync {
    /// Execute a search against the live backend
    async fn search(&self, query: &SolrQuery) -> std::result::Result<Value, BoxError>;

    /// Identity of the backend this client targets
    fn identity(&self) -> &ConnectionIdentity;
}

/// A search result together with where it came from.
///
/// The hit/miss distinction is observable on the outcome instead of
/// being smuggled into the cached value itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    value: Value,
    from_cache: bool,
}

impl SearchOutcome {
    fn live(value: Value) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }

    fn cached(value: Value) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    /// The search result
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consume the outcome, returning the result
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Whether the result was served from the cache
    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    /// Deserialize the result into a typed response.
    ///
    /// # Returns
    ///
    /// Returns the result decoded as `T`
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Serialization` if the result does not match
    /// the shape of `T`. Decoding behaves the same whether the result
    /// came from the cache or the live service.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_value(self.value.clone())?)
    }
}

/// Cache-aside decorator around a [`SolrClient`].
///
/// A freshly constructed wrapper has no cache options: every call is a
/// fully transparent passthrough that never touches the store. Calling
/// [`with_cache`] derives a new view with options attached; the
/// original view is left untouched.
///
/// [`with_cache`]: CachedSolrClient::with_cache
pub struct CachedSolrClient<C: SolrClient> {
    client: Arc<C>,
    store: CacheStore,
    cache_options: Option<CacheOptions>,
}

impl<C: SolrClient> Clone for CachedSolrClient<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: self.store.clone(),
            cache_options: self.cache_options.clone(),
        }
    }
}

impl<C: SolrClient> CachedSolrClient<C> {
    /// Wrap a client with the given cache backend.
    ///
    /// # Arguments
    ///
    /// * `client` - The query-capable client to decorate
    /// * `backend` - The key/value backend shared by all derived views
    ///
    /// # Returns
    ///
    /// Returns a view with caching disabled until [`with_cache`] is
    /// called on it
    ///
    /// [`with_cache`]: CachedSolrClient::with_cache
    pub fn new(client: C, backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            client: Arc::new(client),
            store: CacheStore::new(backend),
            cache_options: None,
        }
    }

    /// Derive a view with cache options attached.
    ///
    /// # Arguments
    ///
    /// * `options` - A [`Ttl`] or `u64` (lifetime only), a string
    ///   (custom key only, backend-default lifetime), a `(ttl, key)`
    ///   tuple, or a full [`CacheOptions`]
    ///
    /// # Returns
    ///
    /// Returns a new view sharing this view's client and store; the
    /// receiver is never mutated
    pub fn with_cache(&self, options: impl Into<CacheOptions>) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: self.store.clone(),
            cache_options: Some(options.into()),
        }
    }

    /// Derive a view with caching disabled
    pub fn without_cache(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            store: self.store.clone(),
            cache_options: None,
        }
    }

    /// The cache options attached to this view, if any
    pub fn cache_options(&self) -> Option<&CacheOptions> {
        self.cache_options.as_ref()
    }

    /// Derive the cache key for a query against this client's backend.
    ///
    /// Pure; no cache side effects. Useful for manual invalidation
    /// alongside [`invalidate`].
    ///
    /// # Arguments
    ///
    /// * `query` - The query to derive a key for
    ///
    /// # Returns
    ///
    /// Returns the 64-character hex key this view would use for `query`
    ///
    /// [`invalidate`]: CachedSolrClient::invalidate
    pub fn cache_key(&self, query: &SolrQuery) -> String {
        keygen::cache_key(self.client.identity(), query)
    }

    /// Execute a search, consulting the cache when this view opted in.
    ///
    /// Views without cache options delegate straight to the underlying
    /// client and never touch the store. Views with options look the key
    /// up first: a hit returns the stored value without contacting the
    /// live service; a miss runs the live search and writes the result
    /// to the store before returning, so a returned outcome implies the
    /// value was handed to the store's write path.
    ///
    /// # Arguments
    ///
    /// * `query` - The query to execute
    ///
    /// # Returns
    ///
    /// Returns the search result together with whether it was served
    /// from the cache
    ///
    /// # Errors
    ///
    /// - `CacheError::Search` if the live search fails; nothing is
    ///   written to the store.
    /// - `CacheError::Store` if the store lookup fails (the live
    ///   service is not contacted; a store outage is never masked as a
    ///   miss) or if the post-search write fails.
    pub async fn search(&self, query: &SolrQuery) -> Result<SearchOutcome> {
        let Some(options) = &self.cache_options else {
            let value = self
                .client
                .search(query)
                .await
                .map_err(CacheError::search)?;
            return Ok(SearchOutcome::live(value));
        };

        let key = match &options.custom_key {
            Some(custom) => custom.clone(),
            None => self.cache_key(query),
        };

        if let Some(value) = self.store.get(&key).await? {
            debug!(%key, "serving search result from cache");
            return Ok(SearchOutcome::cached(value));
        }

        debug!(%key, "cache miss, querying live backend");
        let value = self
            .client
            .search(query)
            .await
            .map_err(CacheError::search)?;

        self.store.set(&key, value.clone(), options.ttl).await?;
        Ok(SearchOutcome::live(value))
    }

    /// Remove a single cache entry by key.
    ///
    /// # Arguments
    ///
    /// * `key` - The store key, typically obtained from [`cache_key`]
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Store` if the backend delete fails
    ///
    /// [`cache_key`]: CachedSolrClient::cache_key
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }

    /// Remove every entry from the backing store.
    ///
    /// Affects all views sharing this store.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Store` if the backend clear fails
    pub async fn clear_cache(&self) -> Result<()> {
        self.store.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;

    struct StaticClient {
        identity: ConnectionIdentity,
    }

    #[async_trait]
    impl SolrClient for StaticClient {
        async fn search(&self, _query: &SolrQuery) -> std::result::Result<Value, BoxError> {
            Ok(serde_json::json!({"numFound": 0}))
        }

        fn identity(&self) -> &ConnectionIdentity {
            &self.identity
        }
    }

    fn client() -> CachedSolrClient<StaticClient> {
        CachedSolrClient::new(
            StaticClient {
                identity: ConnectionIdentity::new("localhost", 8983, "products", "/solr"),
            },
            Arc::new(MemoryBackend::default()),
        )
    }

    #[test]
    fn test_new_client_has_no_cache_options() {
        assert!(client().cache_options().is_none());
    }

    #[test]
    fn test_with_cache_sets_ttl() {
        let view = client().with_cache(30u64);
        assert_eq!(view.cache_options().unwrap().ttl, Ttl::Seconds(30));
        assert!(view.cache_options().unwrap().custom_key.is_none());
    }

    #[test]
    fn test_with_cache_string_sets_only_custom_key() {
        let view = client().with_cache("hot-query");
        let options = view.cache_options().unwrap();
        assert_eq!(options.ttl, Ttl::Default);
        assert_eq!(options.custom_key.as_deref(), Some("hot-query"));
    }

    #[test]
    fn test_with_cache_tuple_sets_both() {
        let view = client().with_cache((40u64, "hot-query"));
        let options = view.cache_options().unwrap();
        assert_eq!(options.ttl, Ttl::Seconds(40));
        assert_eq!(options.custom_key.as_deref(), Some("hot-query"));
    }

    #[test]
    fn test_with_cache_leaves_original_untouched() {
        let base = client();
        let view = base.with_cache(30u64);
        assert!(base.cache_options().is_none());
        assert!(view.cache_options().is_some());
    }

    #[test]
    fn test_without_cache_drops_options() {
        let view = client().with_cache(30u64).without_cache();
        assert!(view.cache_options().is_none());
    }

    #[test]
    fn test_views_carry_independent_options() {
        let base = client();
        let short = base.with_cache(5u64);
        let long = base.with_cache(500u64);
        assert_eq!(short.cache_options().unwrap().ttl, Ttl::Seconds(5));
        assert_eq!(long.cache_options().unwrap().ttl, Ttl::Seconds(500));
    }

    #[test]
    fn test_identity_and_options_serde_round_trip() {
        let identity = ConnectionIdentity::new("localhost", 8983, "products", "/solr");
        let back: ConnectionIdentity =
            serde_json::from_value(serde_json::to_value(&identity).unwrap()).unwrap();
        assert_eq!(identity, back);

        let options: CacheOptions = (30u64, "hot-query").into();
        let back: CacheOptions =
            serde_json::from_value(serde_json::to_value(&options).unwrap()).unwrap();
        assert_eq!(options, back);
    }

    #[test]
    fn test_cache_key_matches_keygen() {
        let base = client();
        let query = SolrQuery::raw("q=*:*");
        let expected = keygen::cache_key(
            &ConnectionIdentity::new("localhost", 8983, "products", "/solr"),
            &query,
        );
        assert_eq!(base.cache_key(&query), expected);
    }
}
