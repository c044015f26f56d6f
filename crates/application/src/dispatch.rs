//! Sending a request snapshot through the HTTP client port.

use std::sync::Arc;

use relay_domain::request::query::append_query_pair;
use relay_domain::{
    ApiKeyPlacement, AuthConfig, DispatchRequest, HeaderMap, ResponseDescriptor, SavedRequest,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ports::HttpClient;

/// Timeout applied to each call unless configured otherwise.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const AUTHORIZATION: &str = "Authorization";

/// Reasons a request is refused before anything is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The url is blank.
    #[error("request URL is empty")]
    EmptyUrl,

    /// The body is not valid JSON.
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),

    /// There is no active tab to send.
    #[error("no active tab")]
    NoActiveTab,
}

/// Turns request snapshots into HTTP calls and normalizes the outcome.
///
/// Transport failures never escape: they come back as error descriptors.
pub struct Dispatcher<C> {
    client: Arc<C>,
    timeout_ms: u64,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            timeout_ms: self.timeout_ms,
        }
    }
}

impl<C: HttpClient> Dispatcher<C> {
    /// Creates a dispatcher with the default timeout.
    #[must_use]
    pub const fn new(client: Arc<C>) -> Self {
        Self {
            client,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns the per-call timeout.
    #[must_use]
    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Resolves a snapshot into a wire request, folding auth into headers or
    /// the query string.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::EmptyUrl`] for a blank url and
    /// [`DispatchError::MalformedBody`] for a body that is not JSON.
    pub fn prepare(&self, request: &SavedRequest) -> Result<DispatchRequest, DispatchError> {
        let mut url = request.url.trim().to_string();
        if url.is_empty() {
            return Err(DispatchError::EmptyUrl);
        }

        let data = request
            .effective_body()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .map_err(|e| DispatchError::MalformedBody(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for header in &request.headers {
            let key = header.key.trim();
            if !key.is_empty() {
                headers.insert(key.to_string(), header.value.clone());
            }
        }

        if let Some(value) = request.auth.authorization_header() {
            insert_if_absent(&mut headers, AUTHORIZATION, value);
        }
        if let AuthConfig::ApiKey {
            key,
            value,
            placement,
        } = &request.auth
            && !key.is_empty()
        {
            match placement {
                ApiKeyPlacement::Header => insert_if_absent(&mut headers, key, value.clone()),
                ApiKeyPlacement::Query => url = append_query_pair(&url, key, value),
            }
        }

        Ok(DispatchRequest {
            method: request.method,
            url,
            timeout_ms: self.timeout_ms,
            headers,
            data,
        })
    }

    /// Executes a prepared request and describes the outcome.
    pub async fn dispatch(&self, request: &DispatchRequest) -> ResponseDescriptor {
        debug!(method = %request.method, url = %request.url, "dispatching");
        match self.client.execute(request).await {
            Ok(response) => {
                if !response.is_success() {
                    warn!(status = response.status, url = %request.url, "request failed");
                }
                ResponseDescriptor::from_response(&response)
            }
            Err(error) => {
                warn!(%error, url = %request.url, "transport failure");
                let message = error.to_string();
                if error.is_cors_like() {
                    ResponseDescriptor::cors_error(&message)
                } else {
                    ResponseDescriptor::network_error(&message, error.code())
                }
            }
        }
    }

    /// Prepares and dispatches a snapshot.
    ///
    /// # Errors
    ///
    /// Returns the [`prepare`](Self::prepare) error; nothing is sent then.
    pub async fn send(&self, request: &SavedRequest) -> Result<ResponseDescriptor, DispatchError> {
        let prepared = self.prepare(request)?;
        Ok(self.dispatch(&prepared).await)
    }
}

fn insert_if_absent(headers: &mut HeaderMap, name: &str, value: String) {
    if !headers.keys().any(|k| k.eq_ignore_ascii_case(name)) {
        headers.insert(name.to_string(), value);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ports::TransportError;
    use crate::test_support::StepClock;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use relay_domain::{Header, HttpMethod, HttpResponse};
    use serde_json::json;
    use std::time::Duration;

    struct MockClient {
        outcome: Result<HttpResponse, TransportError>,
        calls: Mutex<Vec<DispatchRequest>>,
    }

    impl MockClient {
        fn returning(outcome: Result<HttpResponse, TransportError>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    impl HttpClient for MockClient {
        async fn execute(&self, request: &DispatchRequest) -> Result<HttpResponse, TransportError> {
            self.calls.lock().push(request.clone());
            self.outcome.clone()
        }
    }

    fn ok_response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: "OK".into(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
            duration: Duration::from_millis(5),
        }
    }

    fn request(url: &str) -> SavedRequest {
        let mut request = SavedRequest::new("r".into(), "r", HttpMethod::Post, StepClock::epoch());
        request.url = url.to_string();
        request
    }

    fn dispatcher() -> Dispatcher<MockClient> {
        Dispatcher::new(MockClient::returning(Ok(ok_response(200, "{}"))))
    }

    #[test]
    fn test_prepare_defaults() {
        let prepared = dispatcher().prepare(&request("https://api.test/users")).unwrap();
        assert_eq!(prepared.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(prepared.data, None);
        assert_eq!(
            prepared.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
    }

    #[test]
    fn test_prepare_rejects_empty_url() {
        assert_eq!(dispatcher().prepare(&request("   ")), Err(DispatchError::EmptyUrl));
    }

    #[test]
    fn test_prepare_rejects_malformed_body() {
        let mut snapshot = request("https://api.test");
        snapshot.body = Some("{not json".into());
        assert!(matches!(
            dispatcher().prepare(&snapshot),
            Err(DispatchError::MalformedBody(_))
        ));
    }

    #[test]
    fn test_prepare_parses_body() {
        let mut snapshot = request("https://api.test");
        snapshot.body = Some(r#"{"name": "ada"}"#.into());
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.data, Some(json!({"name": "ada"})));
    }

    #[test]
    fn test_prepare_headers_skip_empty_keys_and_last_wins() {
        let mut snapshot = request("https://api.test");
        snapshot.headers = vec![
            Header::new("X-Trace", "1"),
            Header::new("", "orphan"),
            Header::new("X-Trace", "2"),
        ];
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.headers.len(), 1);
        assert_eq!(prepared.headers["X-Trace"], "2");
    }

    #[test]
    fn test_prepare_folds_auth() {
        let mut snapshot = request("https://api.test");
        snapshot.auth = AuthConfig::bearer("tok");
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.headers[AUTHORIZATION], "Bearer tok");

        snapshot.auth = AuthConfig::api_key_query("api_key", "s3cr3t");
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.url, "https://api.test?api_key=s3cr3t");

        snapshot.auth = AuthConfig::api_key_header("X-Api-Key", "s3cr3t");
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.headers["X-Api-Key"], "s3cr3t");
    }

    #[test]
    fn test_explicit_authorization_header_wins() {
        let mut snapshot = request("https://api.test");
        snapshot.headers.push(Header::new("authorization", "Custom x"));
        snapshot.auth = AuthConfig::basic("u", "p");
        let prepared = dispatcher().prepare(&snapshot).unwrap();
        assert_eq!(prepared.headers["authorization"], "Custom x");
        assert!(!prepared.headers.contains_key(AUTHORIZATION));
    }

    #[tokio::test]
    async fn test_send_success() {
        let client = MockClient::returning(Ok(ok_response(200, r#"{"id": 1}"#)));
        let dispatcher = Dispatcher::new(Arc::clone(&client)).with_timeout_ms(500);

        let descriptor = dispatcher.send(&request("https://api.test")).await.unwrap();
        assert!(!descriptor.is_error);
        assert_eq!(descriptor.data, json!({"id": 1}));
        assert_eq!(client.calls.lock()[0].timeout_ms, 500);
    }

    #[tokio::test]
    async fn test_malformed_body_is_never_sent() {
        let client = MockClient::returning(Ok(ok_response(200, "{}")));
        let dispatcher = Dispatcher::new(Arc::clone(&client));
        let mut snapshot = request("https://api.test");
        snapshot.body = Some("nope".into());

        let result = dispatcher.send(&snapshot).await;
        assert!(matches!(result, Err(DispatchError::MalformedBody(_))));
        assert!(client.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_cors_like() {
        let refused = TransportError::Network("connection refused".into());
        let client = MockClient::returning(Err(refused));
        let descriptor = Dispatcher::new(client)
            .send(&request("https://api.test"))
            .await
            .unwrap();
        assert!(descriptor.is_error);
        assert!(descriptor.is_cors_error);
        assert_eq!(descriptor.status, 0);
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let client = MockClient::returning(Err(TransportError::Timeout { timeout_ms: 10 }));
        let descriptor = Dispatcher::new(client)
            .send(&request("https://api.test"))
            .await
            .unwrap();
        assert!(descriptor.is_error);
        assert!(!descriptor.is_cors_error);
        assert_eq!(descriptor.data["code"], "ECONNABORTED");
    }

    #[tokio::test]
    async fn test_http_error_status_is_not_cors() {
        let client = MockClient::returning(Ok(ok_response(500, r#"{"error":"boom"}"#)));
        let descriptor = Dispatcher::new(client)
            .send(&request("https://api.test"))
            .await
            .unwrap();
        assert!(descriptor.is_error);
        assert!(!descriptor.is_cors_error);
        assert_eq!(descriptor.status, 500);
        assert_eq!(descriptor.data["error"], "boom");
    }
}
