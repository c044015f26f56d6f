//! ID generation utilities.

use uuid::Uuid;

/// An opaque, stable identifier for collections, folders and requests.
///
/// Kept as a `String` so persisted documents stay plain JSON strings.
pub type Id = String;

/// Generates a new identifier.
///
/// UUID v7 includes timestamp information and is sortable. The textual form
/// never contains `:`, which tab id derivation relies on.
#[must_use]
pub fn generate_id() -> Id {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        // 8-4-4-4-12 = 36 chars
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
        assert!(!id.contains(':'));
    }

    #[test]
    fn test_generate_id_uniqueness() {
        let ids: std::collections::HashSet<_> = (0..256).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 256);
    }
}
