//! Query representation and canonical string rendering
//!
//! The decorator never interprets query semantics. It only needs a
//! deterministic string rendering of whatever the caller hands it, so
//! that identical queries hash to identical cache keys. Queries arrive
//! in one of three shapes: a builder object exposing a canonical
//! rendering, a plain parameter mapping, or a raw query string.
//! Anything else renders as the empty string rather than failing.

use std::collections::BTreeMap;

/// A query object capable of rendering itself to a canonical string.
///
/// Implemented by query-builder types whose `build` output is already
/// deterministic for equivalent queries.
pub trait QueryBuilder {
    /// Render the query to its canonical string form
    fn build(&self) -> String;
}

/// An opaque search query.
///
/// # Examples
///
/// ```
/// use solr_cache::SolrQuery;
///
/// let q = SolrQuery::params([("q", "rust"), ("rows", "10")]);
/// assert_eq!(q.canonical_string(), "q=rust&rows=10");
///
/// let raw = SolrQuery::raw("q=*:*");
/// assert_eq!(raw.canonical_string(), "q=*:*");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SolrQuery {
    /// Canonical rendering captured from a [`QueryBuilder`]
    Built(String),
    /// Structured parameter mapping; rendered in sorted key order so
    /// insertion order never influences the cache key
    Params(BTreeMap<String, String>),
    /// Raw query string, used verbatim
    Raw(String),
    /// Unrecognized query shape; renders as the empty string
    #[default]
    Empty,
}

impl SolrQuery {
    /// Capture a builder's canonical rendering
    pub fn from_builder<B: QueryBuilder>(builder: &B) -> Self {
        Self::Built(builder.build())
    }

    /// Create a query from key/value parameters
    pub fn params<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Params(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Create a query from a raw query string
    pub fn raw<S: Into<String>>(query: S) -> Self {
        Self::Raw(query.into())
    }

    /// Render the query to its canonical string form.
    ///
    /// Builder and raw queries are used verbatim; parameter mappings
    /// render as percent-encoded `key=value&...` pairs in sorted key
    /// order.
    ///
    /// # Returns
    ///
    /// Returns the canonical rendering; never fails, unrecognized
    /// shapes render as the empty string
    pub fn canonical_string(&self) -> String {
        match self {
            Self::Built(s) | Self::Raw(s) => s.clone(),
            Self::Params(params) => params
                .iter()
                .map(|(k, v)| {
                    format!("{}={}", urlencoding::encode(k), urlencoding::encode(v))
                })
                .collect::<Vec<_>>()
                .join("&"),
            Self::Empty => String::new(),
        }
    }
}

impl From<&str> for SolrQuery {
    fn from(query: &str) -> Self {
        Self::Raw(query.to_string())
    }
}

impl From<String> for SolrQuery {
    fn from(query: String) -> Self {
        Self::Raw(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FacetedQuery {
        q: String,
        facet_field: String,
    }

    impl QueryBuilder for FacetedQuery {
        fn build(&self) -> String {
            format!("q={}&facet=true&facet.field={}", self.q, self.facet_field)
        }
    }

    #[test]
    fn test_builder_rendering_used_verbatim() {
        let builder = FacetedQuery {
            q: "rust".to_string(),
            facet_field: "category".to_string(),
        };
        let query = SolrQuery::from_builder(&builder);
        assert_eq!(
            query.canonical_string(),
            "q=rust&facet=true&facet.field=category"
        );
    }

    #[test]
    fn test_params_render_in_sorted_key_order() {
        let forward = SolrQuery::params([("a", "1"), ("b", "2")]);
        let reversed = SolrQuery::params([("b", "2"), ("a", "1")]);
        assert_eq!(forward.canonical_string(), "a=1&b=2");
        assert_eq!(forward.canonical_string(), reversed.canonical_string());
    }

    #[test]
    fn test_params_are_percent_encoded() {
        let query = SolrQuery::params([("q", "rust async")]);
        assert_eq!(query.canonical_string(), "q=rust%20async");
    }

    #[test]
    fn test_raw_string_used_verbatim() {
        let query = SolrQuery::raw("q=*:*&rows=0");
        assert_eq!(query.canonical_string(), "q=*:*&rows=0");
    }

    #[test]
    fn test_empty_renders_as_empty_string() {
        assert_eq!(SolrQuery::Empty.canonical_string(), "");
        assert_eq!(SolrQuery::default().canonical_string(), "");
    }
}
