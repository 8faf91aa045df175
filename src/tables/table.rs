//! Table definition and row building

use super::column::{Column, ColumnSource};
use crate::error::{Error, Result};
use crate::http::path_segment;
use crate::schema::PropertyDescriptor;
use crate::types::{JsonValue, Record, Row};
use serde::Serialize;
use std::collections::HashSet;

/// How a table's records are fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// A CRM object under `/crm/v3/objects/{type}`
    CrmObject,
    /// Owners under `/crm/v3/owners`
    Owner,
}

/// A table exposed to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name, e.g. `hubspot_company`
    pub name: String,
    /// Human readable description
    pub description: String,
    /// Object type used in API paths
    pub object_type: String,
    /// Fetch style
    pub kind: TableKind,
    /// Columns, fixed ones first
    pub columns: Vec<Column>,
}

impl Table {
    /// Create a table
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        object_type: impl Into<String>,
        kind: TableKind,
        columns: Vec<Column>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            object_type: object_type.into(),
            kind,
            columns,
        }
    }

    /// Add one column per property descriptor
    ///
    /// A property whose name is already a column is skipped; the fixed
    /// column wins.
    #[must_use]
    pub fn with_properties(mut self, descriptors: &[PropertyDescriptor]) -> Self {
        let mut taken: HashSet<String> = self.columns.iter().map(|c| c.name.clone()).collect();

        for descriptor in descriptors {
            if !taken.insert(descriptor.name.clone()) {
                continue;
            }
            self.columns.push(Column::property(
                descriptor.name.clone(),
                descriptor.name.clone(),
                descriptor.column_type(),
                descriptor.column_description(),
            ));
        }
        self
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Whether `name` refers to this table, by table name or object type
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.object_type == name
    }

    /// Columns to produce for a request, all of them when `names` is `None`
    pub fn select(&self, names: Option<&[String]>) -> Result<Vec<&Column>> {
        let Some(names) = names else {
            return Ok(self.columns.iter().collect());
        };

        names
            .iter()
            .map(|name| {
                self.column(name).ok_or_else(|| {
                    Error::invalid_value(
                        "columns",
                        format!("unknown column '{}' in table {}", name, self.name),
                    )
                })
            })
            .collect()
    }

    /// Build a row from a record, leaving hydrated columns null
    pub fn row(&self, record: &Record, columns: &[&Column]) -> Row {
        columns
            .iter()
            .map(|column| (column.name.clone(), column.extract(record)))
            .collect()
    }

    /// Property keys read by property columns, each once, in column order
    pub fn property_keys(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.columns
            .iter()
            .filter_map(|c| match &c.source {
                ColumnSource::Property(key) => Some(key.as_str()),
                _ => None,
            })
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// Whether any of `columns` needs property histories
    pub fn wants_history(columns: &[&Column]) -> bool {
        columns
            .iter()
            .any(|c| c.source == ColumnSource::PropertiesWithHistory)
    }

    /// Path of the list endpoint
    pub fn list_path(&self) -> String {
        match self.kind {
            TableKind::CrmObject => format!("/crm/v3/objects/{}", self.object_type),
            TableKind::Owner => "/crm/v3/owners".to_string(),
        }
    }

    /// Path of the single-record endpoint
    ///
    /// The id is encoded as one path segment; `None` when it cannot name a
    /// record.
    pub fn get_path(&self, id: &str) -> Option<String> {
        path_segment(id).map(|id| format!("{}/{}", self.list_path(), id))
    }
}

/// Set a hydrated value on a row that was built without it
pub fn fill(row: &mut Row, column: &Column, value: JsonValue) {
    row.insert(column.name.clone(), value);
}
