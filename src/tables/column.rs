//! Columns and value conversion

use crate::types::{ColumnType, JsonValue, Record};
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

/// Record field carrying property histories when they were requested
pub const PROPERTIES_WITH_HISTORY_FIELD: &str = "propertiesWithHistory";

/// Where a column's value comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum ColumnSource {
    /// The record id
    Id,
    /// A top-level field of the record (`createdAt`, `archived`, ...)
    Field(String),
    /// A named property
    Property(String),
    /// The whole property map
    Properties,
    /// Value history of every requested property
    PropertiesWithHistory,
    /// Ids of associated records of the given object type
    Associations(String),
    /// Portal id of the connected account
    PortalId,
}

impl ColumnSource {
    /// Whether the value needs an extra request instead of coming from the record
    pub fn is_hydrated(&self) -> bool {
        matches!(self, ColumnSource::Associations(_) | ColumnSource::PortalId)
    }
}

/// A table column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Human readable description
    pub description: String,
    /// Value source
    pub source: ColumnSource,
}

impl Column {
    /// Create a column
    pub fn new(
        name: impl Into<String>,
        column_type: ColumnType,
        description: impl Into<String>,
        source: ColumnSource,
    ) -> Self {
        Self {
            name: name.into(),
            column_type,
            description: description.into(),
            source,
        }
    }

    /// Column reading a top-level record field
    pub fn field(
        name: impl Into<String>,
        key: impl Into<String>,
        column_type: ColumnType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, column_type, description, ColumnSource::Field(key.into()))
    }

    /// Column reading a named property
    pub fn property(
        name: impl Into<String>,
        key: impl Into<String>,
        column_type: ColumnType,
        description: impl Into<String>,
    ) -> Self {
        Self::new(name, column_type, description, ColumnSource::Property(key.into()))
    }

    /// Value of this column for `record`
    ///
    /// Hydrated columns yield null here; the connector fills them in.
    pub fn extract(&self, record: &Record) -> JsonValue {
        match &self.source {
            ColumnSource::Id => JsonValue::String(record.id.clone()),
            ColumnSource::Field(key) => record
                .field(key)
                .map_or(JsonValue::Null, |v| convert(v, self.column_type)),
            ColumnSource::Property(key) => record
                .properties
                .get(key)
                .map_or(JsonValue::Null, |v| convert(v, self.column_type)),
            ColumnSource::Properties => JsonValue::Object(record.properties.clone()),
            ColumnSource::PropertiesWithHistory => record
                .field(PROPERTIES_WITH_HISTORY_FIELD)
                .cloned()
                .unwrap_or(JsonValue::Null),
            ColumnSource::Associations(_) | ColumnSource::PortalId => JsonValue::Null,
        }
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert a raw JSON value to the representation of `column_type`
///
/// HubSpot sends most property values as strings. Values that do not parse
/// as the target type become null; empty strings are null for every type
/// except text.
pub fn convert(value: &JsonValue, column_type: ColumnType) -> JsonValue {
    if value.is_null() {
        return JsonValue::Null;
    }
    if column_type != ColumnType::String && value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return JsonValue::Null;
    }

    match column_type {
        ColumnType::String => match value {
            JsonValue::String(_) => value.clone(),
            other => JsonValue::String(other.to_string()),
        },
        ColumnType::Double => to_f64(value)
            .and_then(serde_json::Number::from_f64)
            .map_or(JsonValue::Null, JsonValue::Number),
        ColumnType::Int => to_i64(value).map_or(JsonValue::Null, JsonValue::from),
        ColumnType::Bool => to_bool(value).map_or(JsonValue::Null, JsonValue::Bool),
        ColumnType::Timestamp => to_timestamp(value).map_or(JsonValue::Null, |ts| {
            JsonValue::String(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
        }),
        ColumnType::Json => value.clone(),
    }
}

fn to_f64(value: &JsonValue) -> Option<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_i64(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn to_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    match value {
        JsonValue::Number(n) => n.as_i64().and_then(from_epoch_millis),
        JsonValue::String(s) => parse_timestamp(s.trim()),
        _ => None,
    }
}

/// Parse RFC 3339, epoch milliseconds, or a bare `YYYY-MM-DD` date
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(millis) = s.parse::<i64>() {
        return from_epoch_millis(millis);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}
