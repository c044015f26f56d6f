//! Typed partial updates for requests

use serde::{Deserialize, Serialize};

use super::header::Header;
use super::method::HttpMethod;
use super::saved::SavedRequest;
use crate::auth::AuthConfig;

/// A partial update to a [`SavedRequest`].
///
/// Only the named fields are touched. `id` and the timestamps are not
/// patchable; the store owns `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// New url, query string included
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Replacement header rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,
    /// New body; `Some(None)` clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Option<String>>,
    /// New auth scheme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl RequestPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the method.
    #[must_use]
    pub const fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Replaces the headers.
    #[must_use]
    pub fn with_headers(mut self, headers: Vec<Header>) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Some(body.into()));
        self
    }

    /// Marks the body absent.
    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.body = Some(None);
        self
    }

    /// Sets the auth scheme.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns true if the patch names no field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.method.is_none()
            && self.url.is_none()
            && self.headers.is_none()
            && self.body.is_none()
            && self.auth.is_none()
    }

    /// Returns true if applying the patch would modify `request`.
    #[must_use]
    pub fn would_change(&self, request: &SavedRequest) -> bool {
        fn differs<T: PartialEq>(patch: Option<&T>, current: &T) -> bool {
            patch.is_some_and(|value| value != current)
        }

        differs(self.name.as_ref(), &request.name)
            || differs(self.method.as_ref(), &request.method)
            || differs(self.url.as_ref(), &request.url)
            || differs(self.headers.as_ref(), &request.headers)
            || differs(self.body.as_ref(), &request.body)
            || differs(self.auth.as_ref(), &request.auth)
    }

    /// Merges the patch into `request` field by field.
    ///
    /// Returns whether anything changed.
    pub fn apply(&self, request: &mut SavedRequest) -> bool {
        if !self.would_change(request) {
            return false;
        }
        if let Some(name) = &self.name {
            request.name.clone_from(name);
        }
        if let Some(method) = self.method {
            request.method = method;
        }
        if let Some(url) = &self.url {
            request.url.clone_from(url);
        }
        if let Some(headers) = &self.headers {
            request.headers.clone_from(headers);
        }
        if let Some(body) = &self.body {
            request.body.clone_from(body);
        }
        if let Some(auth) = &self.auth {
            request.auth = auth.clone();
        }
        true
    }
}
