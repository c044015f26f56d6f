//! HTTP Client port

use std::future::Future;

use relay_domain::{DispatchRequest, HttpResponse};
use thiserror::Error;

/// Transport-level failures: no HTTP response was received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connecting or talking to the host failed.
    #[error("network error: {0}")]
    Network(String),

    /// The call did not finish within its timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout that elapsed
        timeout_ms: u64,
    },

    /// The url could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns the stable failure code shown to users.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "ERR_NETWORK",
            Self::Timeout { .. } => "ECONNABORTED",
            Self::InvalidUrl(_) => "ERR_INVALID_URL",
            Self::Other(_) => "ERR_UNKNOWN",
        }
    }

    /// Heuristic: a generic network failure with no status, or a message
    /// that mentions CORS, is treated as a cross-origin rejection.
    #[must_use]
    pub fn is_cors_like(&self) -> bool {
        matches!(self, Self::Network(_)) || self.to_string().contains("CORS")
    }
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Executes a request and returns the raw response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error only when no HTTP response was received.
    fn execute(
        &self,
        request: &DispatchRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
