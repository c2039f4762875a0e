//! Deterministic cache key derivation
//!
//! A cache key identifies one query against one backend. The key is the
//! SHA-256 hex digest of a canonical JSON record combining the query's
//! canonical string with the connection identity (host, port, core,
//! path), so identical queries against different backends never share an
//! entry. Mapping keys are sorted recursively before serialization, so
//! two semantically identical records always digest to the same key.
//! Hashing keeps storage keys at a bounded, uniform length regardless of
//! query complexity.

use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::client::ConnectionIdentity;
use crate::query::SolrQuery;

/// Derive the cache key for a query against a given connection identity.
///
/// Pure and infallible: the same identity and query always produce the
/// same key.
///
/// # Arguments
///
/// * `identity` - The connection identity of the targeted backend
/// * `query` - The query to derive a key for
///
/// # Returns
///
/// Returns a 64-character lowercase hex SHA-256 digest of the
/// canonicalized `{query, host, port, core, path}` record
///
/// # Examples
///
/// ```
/// use solr_cache::{cache_key, ConnectionIdentity, SolrQuery};
///
/// let identity = ConnectionIdentity::new("localhost", 8983, "products", "/solr");
/// let key = cache_key(&identity, &SolrQuery::raw("q=*:*"));
/// assert_eq!(key.len(), 64);
/// assert_eq!(key, cache_key(&identity, &SolrQuery::raw("q=*:*")));
/// ```
pub fn cache_key(identity: &ConnectionIdentity, query: &SolrQuery) -> String {
    let record = json!({
        "query": query.canonical_string(),
        "host": identity.host,
        "port": identity.port,
        "core": identity.core,
        "path": identity.path,
    });

    digest(&sort_keys(record).to_string())
}

/// Recursively sort all object keys in a JSON value.
///
/// Array element order is preserved; only mapping key order is
/// normalized. This makes the serialization insertion-order independent.
pub(crate) fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// SHA-256 hex digest of the canonical serialization
fn digest(serialized: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    format!("{:x}", hasher.finalize())
}
