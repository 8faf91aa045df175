//! Common types used throughout hubspot-tables
//!
//! This module contains shared type definitions, type aliases,
//! and the decoded record shape every table works from.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A table output row: column name to value
pub type Row = JsonObject;

// ============================================================================
// Column Types
// ============================================================================

/// Type of a table column as reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// UTF-8 text
    String,
    /// 64-bit float
    Double,
    /// 64-bit integer
    Int,
    /// Boolean
    Bool,
    /// RFC 3339 timestamp
    Timestamp,
    /// Arbitrary JSON
    Json,
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Json => write!(f, "json"),
        }
    }
}

// ============================================================================
// Object Types
// ============================================================================

/// CRM object type names as used in HubSpot URLs
pub mod object_type {
    /// Companies
    pub const COMPANY: &str = "company";
    /// Contacts
    pub const CONTACT: &str = "contact";
    /// Deals
    pub const DEAL: &str = "deal";
    /// Tickets
    pub const TICKET: &str = "ticket";
    /// Owners (not a CRM object, but listed like one)
    pub const OWNER: &str = "owner";
}

// ============================================================================
// Records
// ============================================================================

/// A record decoded from a HubSpot list or get response
///
/// CRM objects put their data under `properties`; owners put everything at
/// the top level, which lands in `fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Opaque record identifier
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Named properties (custom and built-in)
    #[serde(default)]
    pub properties: JsonObject,

    /// All other top-level fields (createdAt, archived, ...)
    #[serde(flatten)]
    pub fields: JsonObject,
}

impl Record {
    /// Create a record with the given id and no data
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Add a property
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Add a top-level field
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Property value as text, `None` when missing or null
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).and_then(JsonValue::as_str)
    }

    /// Top-level field, `None` when missing or null
    pub fn field(&self, name: &str) -> Option<&JsonValue> {
        self.fields.get(name).filter(|v| !v.is_null())
    }
}

/// Accept ids sent either as JSON strings or numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_crm_object() {
        let record: Record = serde_json::from_value(json!({
            "id": "512",
            "properties": {"domain": "example.com", "name": null},
            "createdAt": "2024-01-02T03:04:05.000Z",
            "archived": false
        }))
        .unwrap();

        assert_eq!(record.id, "512");
        assert_eq!(record.property("domain"), Some("example.com"));
        assert_eq!(record.property("name"), None);
        assert_eq!(record.field("archived"), Some(&json!(false)));
        assert!(record.field("archivedAt").is_none());
    }

    #[test]
    fn test_record_numeric_id() {
        let record: Record = serde_json::from_value(json!({
            "id": 42,
            "email": "owner@example.com"
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert!(record.properties.is_empty());
        assert_eq!(record.field("email"), Some(&json!("owner@example.com")));
    }

    #[test]
    fn test_column_type_display() {
        assert_eq!(ColumnType::Double.to_string(), "double");
        assert_eq!(ColumnType::Timestamp.to_string(), "timestamp");
    }
}
