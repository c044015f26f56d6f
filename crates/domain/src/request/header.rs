//! HTTP Header types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Name of the content type header.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Content type new requests start with.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A single HTTP header row. Order within a request is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Content-Type")
    pub key: String,
    /// The header value (e.g., "application/json")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates the `Content-Type: application/json` header.
    #[must_use]
    pub fn json_content_type() -> Self {
        Self::new(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }

    /// Parses a `Key: Value` line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line has no `:` separator or an empty key.
    pub fn parse_line(line: &str) -> DomainResult<Self> {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidPair(line.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::InvalidPair(line.to_string()));
        }
        Ok(Self::new(key, value.trim()))
    }

    /// Returns true if this header's key matches `name`, ignoring ASCII case.
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.key.eq_ignore_ascii_case(name)
    }
}

/// Headers a freshly created request starts with.
#[must_use]
pub fn default_headers() -> Vec<Header> {
    vec![Header::json_content_type()]
}
