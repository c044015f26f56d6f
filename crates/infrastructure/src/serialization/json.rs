//! JSON helpers for state files.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// The serializer produced invalid UTF-8.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serializes a value to pretty JSON with 2-space indentation and a
/// trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Same as [`to_json_stable`] but returns bytes for direct file writing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SerializationError> {
    to_json_stable(value).map(String::into_bytes)
}

/// Deserializes JSON from a string.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, SerializationError> {
    serde_json::from_str(json).map_err(SerializationError::Deserialize)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_domain::{CollectionsState, PersistedState, TabsState};

    #[test]
    fn test_state_document_layout() {
        let doc = PersistedState::new(TabsState::default(), 1);
        let json = to_json_stable(&doc).unwrap();
        assert_eq!(
            json,
            "{\n  \"state\": {\n    \"openTabs\": [],\n    \"activeTab\": null\n  },\n  \"version\": 1\n}\n"
        );
    }

    #[test]
    fn test_bytes_match_string() {
        let doc = PersistedState::new(CollectionsState::default(), 0);
        assert_eq!(
            to_json_stable_bytes(&doc).unwrap(),
            to_json_stable(&doc).unwrap().into_bytes()
        );
    }

    #[test]
    fn test_from_json_accepts_minified() {
        let doc: PersistedState<CollectionsState> =
            from_json(r#"{"state":{"collections":[]},"version":0}"#).unwrap();
        assert!(doc.state.collections.is_empty());
        assert!(from_json_bytes::<PersistedState<CollectionsState>>(b"[").is_err());
    }
}
