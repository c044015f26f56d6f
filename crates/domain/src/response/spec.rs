//! Dispatch request and response descriptor types
//!
//! A [`DispatchRequest`] is what goes over the wire, an [`HttpResponse`] is
//! what the transport hands back, and a [`ResponseDescriptor`] is the
//! normalized outcome shown to the user, success or not.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::request::HttpMethod;

/// Header map sent or received. Keys are unique; later writes win.
pub type HeaderMap = BTreeMap<String, String>;

/// Status text for transport failures classified as CORS-like.
pub const CORS_STATUS_TEXT: &str = "CORS Error";

/// Status text for other transport failures.
pub const NETWORK_STATUS_TEXT: &str = "Network Error";

/// A fully resolved request ready for the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Final url, auth query pairs included
    pub url: String,
    /// Per-call timeout
    pub timeout_ms: u64,
    /// Headers, auth headers folded in
    pub headers: HeaderMap,
    /// Parsed JSON body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A raw HTTP response as returned by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Reason phrase
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw body bytes
    pub body: Vec<u8>,
    /// Time from send to full body
    pub duration: Duration,
}

impl HttpResponse {
    /// Returns true for a 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the body as JSON, falling back to the body text.
    #[must_use]
    pub fn data(&self) -> Value {
        if self.body.is_empty() {
            return Value::String(String::new());
        }
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&self.body).into_owned()))
    }
}

/// The normalized outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDescriptor {
    /// Status code; 0 when no HTTP response was received
    pub status: u16,
    /// Reason phrase or failure label
    pub status_text: String,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body or failure details
    pub data: Value,
    /// Elapsed time; 0 for errors
    pub duration_ms: u64,
    /// Length of `data` serialized as JSON; 0 for errors
    pub size_bytes: usize,
    /// Whether this describes a failure
    pub is_error: bool,
    /// Whether the failure was classified as CORS-like
    pub is_cors_error: bool,
}

impl ResponseDescriptor {
    /// Describes a received response. Non-2xx statuses become error
    /// descriptors carrying the server's status, headers and data.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let data = response.data();
        if !response.is_success() {
            return Self {
                status: response.status,
                status_text: response.status_text.clone(),
                headers: response.headers.clone(),
                data,
                duration_ms: 0,
                size_bytes: 0,
                is_error: true,
                is_cors_error: false,
            };
        }
        let size_bytes = serde_json::to_string(&data).map_or(0, |s| s.len());
        Self {
            status: response.status,
            status_text: response.status_text.clone(),
            headers: response.headers.clone(),
            data,
            duration_ms: u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            size_bytes,
            is_error: false,
            is_cors_error: false,
        }
    }

    /// Describes a transport failure classified as CORS-like.
    #[must_use]
    pub fn cors_error(message: &str) -> Self {
        Self::transport_failure(
            CORS_STATUS_TEXT,
            json!({
                "error": "CORS Policy Violation",
                "message": "The request was blocked before any response arrived. The target may reject cross-origin or proxied traffic.",
                "originalError": message,
                "suggestions": [
                    "Check that the host is reachable from this machine",
                    "Route the request through a proxy service",
                    "Set up your own proxy server",
                    "Contact the API provider to enable CORS",
                ],
            }),
            true,
        )
    }

    /// Describes any other transport failure.
    #[must_use]
    pub fn network_error(message: &str, code: &str) -> Self {
        Self::transport_failure(
            NETWORK_STATUS_TEXT,
            json!({ "error": message, "code": code }),
            false,
        )
    }

    fn transport_failure(status_text: &str, data: Value, is_cors_error: bool) -> Self {
        Self {
            status: 0,
            status_text: status_text.to_string(),
            headers: HeaderMap::new(),
            data,
            duration_ms: 0,
            size_bytes: 0,
            is_error: true,
            is_cors_error,
        }
    }
}
