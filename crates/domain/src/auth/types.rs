//! Authentication configuration types

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Authentication configuration for a request. Exactly one scheme is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,
    /// Bearer token authentication
    Bearer {
        /// The bearer token
        token: String,
    },
    /// Basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
    /// API Key authentication
    ApiKey {
        /// Header or query parameter name
        key: String,
        /// The API key value
        value: String,
        /// Where to add the key
        #[serde(rename = "addTo", default)]
        placement: ApiKeyPlacement,
    },
    /// `OAuth2` with an already acquired access token
    #[serde(rename = "oauth2", rename_all = "camelCase")]
    OAuth2 {
        /// The access token
        access_token: String,
        /// Token type, usually "Bearer"
        #[serde(default = "default_token_type")]
        token_type: String,
    },
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Location for API key authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyPlacement {
    /// Add to request headers
    #[default]
    Header,
    /// Add to query parameters
    Query,
}

impl AuthConfig {
    /// Creates a bearer token authentication.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Creates a basic authentication.
    #[must_use]
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates an API key authentication sent as a header.
    #[must_use]
    pub fn api_key_header(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            value: value.into(),
            placement: ApiKeyPlacement::Header,
        }
    }

    /// Creates an API key authentication sent as a query parameter.
    #[must_use]
    pub fn api_key_query(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            value: value.into(),
            placement: ApiKeyPlacement::Query,
        }
    }

    /// Creates an `OAuth2` authentication from an access token.
    #[must_use]
    pub fn oauth2(access_token: impl Into<String>) -> Self {
        Self::OAuth2 {
            access_token: access_token.into(),
            token_type: default_token_type(),
        }
    }

    /// Returns the `Authorization` header value this scheme produces, if any.
    #[must_use]
    pub fn authorization_header(&self) -> Option<String> {
        match self {
            Self::Bearer { token } => Some(format!("Bearer {token}")),
            Self::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{username}:{password}"));
                Some(format!("Basic {encoded}"))
            }
            Self::OAuth2 {
                access_token,
                token_type,
            } => Some(format!("{token_type} {access_token}")),
            Self::None | Self::ApiKey { .. } => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_none() {
        assert_eq!(AuthConfig::default(), AuthConfig::None);
    }

    #[test]
    fn test_authorization_header() {
        assert_eq!(
            AuthConfig::bearer("abc").authorization_header().as_deref(),
            Some("Bearer abc")
        );
        assert_eq!(
            AuthConfig::basic("user", "pass")
                .authorization_header()
                .as_deref(),
            Some("Basic dXNlcjpwYXNz")
        );
        assert_eq!(
            AuthConfig::oauth2("tok").authorization_header().as_deref(),
            Some("Bearer tok")
        );
        assert_eq!(AuthConfig::api_key_header("X-Key", "v").authorization_header(), None);
    }

    #[test]
    fn test_serialized_tags() {
        let json = serde_json::to_value(AuthConfig::api_key_query("key", "secret")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "api-key",
                "key": "key",
                "value": "secret",
                "addTo": "query"
            })
        );

        let json = serde_json::to_value(AuthConfig::oauth2("tok")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "oauth2", "accessToken": "tok", "tokenType": "Bearer"})
        );

        let json = serde_json::to_value(AuthConfig::None).unwrap();
        assert_eq!(json, serde_json::json!({"type": "none"}));
    }

    #[test]
    fn test_deserialize_api_key_defaults_to_header() {
        let auth: AuthConfig =
            serde_json::from_str(r#"{"type":"api-key","key":"X-Key","value":"v"}"#).unwrap();
        assert_eq!(auth, AuthConfig::api_key_header("X-Key", "v"));
    }
}
