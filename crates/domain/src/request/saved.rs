//! The stored request definition

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::header::{Header, default_headers};
use super::method::HttpMethod;
use super::query::{QueryParams, parse_params};
use crate::auth::AuthConfig;
use crate::id::Id;

/// A stored HTTP call definition.
///
/// The canonical copy lives inside a folder; open tabs hold clones of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedRequest {
    /// Unique identifier, immutable once assigned
    pub id: Id,
    /// Display name
    pub name: String,
    /// HTTP method
    pub method: HttpMethod,
    /// Target URL, including any query string
    #[serde(default)]
    pub url: String,
    /// Ordered header rows
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Raw body text, absent when the request has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Authentication scheme
    #[serde(default)]
    pub auth: AuthConfig,
    /// Creation instant
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    /// Last mutation instant
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl SavedRequest {
    /// Creates a request with the defaults new requests start with: empty url,
    /// a JSON content type header, an empty body and no auth.
    #[must_use]
    pub fn new(id: Id, name: impl Into<String>, method: HttpMethod, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            method,
            url: String::new(),
            headers: default_headers(),
            body: Some(String::new()),
            auth: AuthConfig::None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Derives the structured query params from the url.
    #[must_use]
    pub fn query_params(&self) -> QueryParams {
        parse_params(&self.url)
    }

    /// Returns the body when it holds non-whitespace text.
    #[must_use]
    pub fn effective_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.trim().is_empty())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_new_request_defaults() {
        let request = SavedRequest::new("r1".into(), "List users", HttpMethod::Get, fixed_now());
        assert_eq!(request.url, "");
        assert_eq!(request.headers, vec![Header::json_content_type()]);
        assert_eq!(request.body.as_deref(), Some(""));
        assert_eq!(request.auth, AuthConfig::None);
        assert_eq!(request.created_at, request.updated_at);
        assert_eq!(request.effective_body(), None);
    }

    #[test]
    fn test_persisted_shape() {
        let request = SavedRequest::new("r1".into(), "Ping", HttpMethod::Post, fixed_now());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["createdAt"], fixed_now().timestamp_millis());
        assert_eq!(json["auth"]["type"], "none");
        assert_eq!(json["headers"][0]["key"], "Content-Type");

        let back: SavedRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_absent_body_is_omitted() {
        let mut request = SavedRequest::new("r1".into(), "Ping", HttpMethod::Get, fixed_now());
        request.body = None;
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("body").is_none());
    }

    #[test]
    fn test_query_params_follow_url() {
        let mut request = SavedRequest::new("r1".into(), "Users", HttpMethod::Get, fixed_now());
        request.url = "https://api.test/users?active=true".to_string();
        assert_eq!(request.query_params().pairs(), vec![("active", "true")]);
    }
}
