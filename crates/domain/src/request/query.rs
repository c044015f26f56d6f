//! Query parameter types and the url/params duality.
//!
//! A request stores its query string inside `url`. The params editor works on
//! structured rows instead; these helpers split the url, parse the query into
//! rows and serialize edited rows back into the url.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::{DomainError, DomainResult};

/// A query parameter key-value pair.
///
/// Supports enable/disable without deletion for UI convenience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParam {
    /// The parameter key
    pub key: String,
    /// The parameter value
    pub value: String,
    /// Whether this parameter is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

impl QueryParam {
    /// Creates a new enabled query parameter.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// Creates a disabled query parameter.
    #[must_use]
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: false,
        }
    }

    /// Parses a `key=value` row. A leading `!` marks the row disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the row has no `=` separator.
    pub fn parse_row(row: &str) -> DomainResult<Self> {
        let (enabled, row) = row
            .strip_prefix('!')
            .map_or((true, row), |rest| (false, rest));
        let (key, value) = row
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidPair(row.to_string()))?;
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
            enabled,
        })
    }

    /// Returns whether the row takes part in serialization.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_serializable(&self) -> bool {
        self.enabled && !self.key.is_empty()
    }
}

/// An ordered collection of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParams {
    items: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty query parameter collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a query parameter to the collection.
    pub fn add(&mut self, param: QueryParam) {
        self.items.push(param);
    }

    /// Returns an iterator over enabled parameters.
    pub fn enabled(&self) -> impl Iterator<Item = &QueryParam> {
        self.items.iter().filter(|p| p.enabled)
    }

    /// Returns all parameters (enabled and disabled).
    #[must_use]
    pub fn all(&self) -> &[QueryParam] {
        &self.items
    }

    /// Returns the enabled, non-empty-key pairs in order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.items
            .iter()
            .filter(|p| p.is_serializable())
            .map(|p| (p.key.as_str(), p.value.as_str()))
            .collect()
    }

    /// Returns the number of parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no parameters.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<QueryParam> for QueryParams {
    fn from_iter<T: IntoIterator<Item = QueryParam>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Splits `url` at the first `?` into its base and raw query string.
#[must_use]
pub fn split_url(url: &str) -> (&str, Option<&str>) {
    match url.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (url, None),
    }
}

/// Parses the query suffix of `url` into enabled rows, in order.
///
/// Decoding follows `application/x-www-form-urlencoded` rules. A url without
/// `?` yields no rows.
#[must_use]
pub fn parse_params(url: &str) -> QueryParams {
    let Some(query) = split_url(url).1 else {
        return QueryParams::new();
    };
    form_urlencoded::parse(query.as_bytes())
        .map(|(key, value)| QueryParam::new(key, value))
        .collect()
}

/// Serializes enabled rows with a non-empty key into a query string.
#[must_use]
pub fn serialize_params(params: &QueryParams) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params.pairs() {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Replaces the query suffix of `url` with the serialized `params`.
///
/// The `?` is dropped entirely when no row serializes.
#[must_use]
pub fn build_url(url: &str, params: &QueryParams) -> String {
    let (base, _) = split_url(url);
    let query = serialize_params(params);
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{query}")
    }
}

/// Appends one encoded pair to whatever query `url` already carries.
#[must_use]
pub fn append_query_pair(url: &str, key: &str, value: &str) -> String {
    let pair = form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish();
    match split_url(url) {
        (_, None) => format!("{url}?{pair}"),
        (_, Some("")) => format!("{url}{pair}"),
        (_, Some(_)) => format!("{url}&{pair}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_query_param_creation() {
        let param = QueryParam::new("page", "1");
        assert_eq!(param.key, "page");
        assert_eq!(param.value, "1");
        assert!(param.enabled);
        assert!(!QueryParam::disabled("debug", "true").enabled);
    }

    #[test]
    fn test_parse_row() {
        assert_eq!(QueryParam::parse_row("a=1").unwrap(), QueryParam::new("a", "1"));
        assert_eq!(
            QueryParam::parse_row("!debug=true").unwrap(),
            QueryParam::disabled("debug", "true")
        );
        assert_eq!(QueryParam::parse_row("q=a=b").unwrap().value, "a=b");
        assert!(QueryParam::parse_row("novalue").is_err());
    }

    #[test]
    fn test_split_url() {
        assert_eq!(split_url("https://a.test/x"), ("https://a.test/x", None));
        assert_eq!(
            split_url("https://a.test/x?a=1?b"),
            ("https://a.test/x", Some("a=1?b"))
        );
    }

    #[test]
    fn test_parse_params_in_order() {
        let params = parse_params("https://api.test/users?active=true&page=2&q=hello%20world");
        assert_eq!(
            params.pairs(),
            vec![("active", "true"), ("page", "2"), ("q", "hello world")]
        );
        assert!(params.all().iter().all(|p| p.enabled));
    }

    #[test]
    fn test_parse_params_without_query() {
        assert!(parse_params("https://api.test/users").is_empty());
        assert!(parse_params("https://api.test/users?").is_empty());
    }

    #[test]
    fn test_serialize_skips_disabled_and_empty_keys() {
        let params: QueryParams = vec![
            QueryParam::new("page", "1"),
            QueryParam::disabled("debug", "true"),
            QueryParam::new("", "orphan"),
            QueryParam::new("limit", "10"),
        ]
        .into_iter()
        .collect();

        assert_eq!(params.enabled().count(), 3);
        assert_eq!(serialize_params(&params), "page=1&limit=10");
    }

    #[test]
    fn test_round_trip_preserves_enabled_pairs() {
        let urls = [
            "https://api.test/users",
            "https://api.test/users?active=true",
            "https://api.test/search?q=rust+lang&tag=a%26b&empty=",
            "https://api.test/x?k=v&k=w",
        ];
        for url in urls {
            let parsed = parse_params(url);
            let reparsed = parse_params(&format!("x?{}", serialize_params(&parsed)));
            assert_eq!(reparsed.pairs(), parsed.pairs(), "url: {url}");
        }
    }

    #[test]
    fn test_build_url() {
        let params: QueryParams = vec![QueryParam::new("active", "true")].into_iter().collect();
        assert_eq!(
            build_url("https://api.test/users?old=1", &params),
            "https://api.test/users?active=true"
        );
        assert_eq!(
            build_url("https://api.test/users?old=1", &QueryParams::new()),
            "https://api.test/users"
        );
    }

    #[test]
    fn test_build_url_is_idempotent() {
        let url = "https://api.test/users?active=true&page=2";
        let once = build_url(url, &parse_params(url));
        let twice = build_url(&once, &parse_params(&once));
        assert_eq!(once, url);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_append_query_pair() {
        assert_eq!(append_query_pair("https://a.test", "k", "v"), "https://a.test?k=v");
        assert_eq!(append_query_pair("https://a.test?", "k", "v"), "https://a.test?k=v");
        assert_eq!(
            append_query_pair("https://a.test?a=1", "api key", "x y"),
            "https://a.test?a=1&api+key=x+y"
        );
    }
}
