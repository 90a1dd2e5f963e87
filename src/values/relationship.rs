//! References to related entities.

use serde::{Deserialize, Serialize};

/// A pointer to another entity, as embedded in current-generation responses
/// (`{"id": 12, "type": "users"}`).
///
/// The target is never resolved automatically; fetch it with the matching
/// get request when its full data is needed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: i64,

    /// Entity type discriminator (e.g. "users", "companies").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Display name, when the API includes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Extra attributes some endpoints attach to the reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Relationship {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Whether this reference points at the given entity type.
    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_minimal() {
        let rel: Relationship = serde_json::from_str(r#"{"id": 9}"#).unwrap();
        assert_eq!(rel.id, 9);
        assert!(rel.kind.is_none());
        assert!(rel.name.is_none());
    }

    #[test]
    fn test_relationship_with_type_and_meta() {
        let rel: Relationship =
            serde_json::from_str(r#"{"id": 3, "type": "users", "meta": {"isOwner": true}}"#)
                .unwrap();
        assert!(rel.is("users"));
        assert_eq!(rel.meta.unwrap()["isOwner"], serde_json::json!(true));
    }

    #[test]
    fn test_relationship_requires_id() {
        assert!(serde_json::from_str::<Relationship>(r#"{"type": "users"}"#).is_err());
    }
}
