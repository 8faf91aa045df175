//! Schema types

use crate::types::ColumnType;
use serde::{Deserialize, Serialize};

/// Declared type of a HubSpot property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    String,
    Number,
    Bool,
    Datetime,
    Date,
    Enumeration,
    PhoneNumber,
    /// Any type this crate does not know about
    #[serde(other)]
    Other,
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyType::String => write!(f, "string"),
            PropertyType::Number => write!(f, "number"),
            PropertyType::Bool => write!(f, "bool"),
            PropertyType::Datetime => write!(f, "datetime"),
            PropertyType::Date => write!(f, "date"),
            PropertyType::Enumeration => write!(f, "enumeration"),
            PropertyType::PhoneNumber => write!(f, "phone_number"),
            PropertyType::Other => write!(f, "other"),
        }
    }
}

/// Map a declared property type to the column type it is exposed as
///
/// Anything without a closer match is text.
pub fn column_type_for(property_type: PropertyType) -> ColumnType {
    match property_type {
        PropertyType::Number => ColumnType::Double,
        PropertyType::Bool => ColumnType::Bool,
        PropertyType::Datetime | PropertyType::Date => ColumnType::Timestamp,
        PropertyType::String
        | PropertyType::Enumeration
        | PropertyType::PhoneNumber
        | PropertyType::Other => ColumnType::String,
    }
}

/// A property as published by the properties endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Internal name, used as the property key and column name
    pub name: String,

    /// Display label
    #[serde(default)]
    pub label: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Declared type
    #[serde(rename = "type", default = "default_property_type")]
    pub property_type: PropertyType,

    /// UI field type (text, select, checkbox, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Property group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

fn default_property_type() -> PropertyType {
    PropertyType::Other
}

impl PropertyDescriptor {
    /// Create a descriptor with no label or description
    pub fn new(name: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            description: String::new(),
            property_type,
            field_type: None,
            group_name: None,
        }
    }

    /// Column type for this property
    pub fn column_type(&self) -> ColumnType {
        column_type_for(self.property_type)
    }

    /// Description to show for the column: description, then label, then name
    pub fn column_description(&self) -> &str {
        [&self.description, &self.label]
            .into_iter()
            .find(|s| !s.is_empty())
            .map_or(self.name.as_str(), String::as_str)
    }
}

/// Response body of the properties endpoint
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PropertiesResponse {
    #[serde(default)]
    pub results: Vec<PropertyDescriptor>,
}
