//! Table module
//!
//! Tables turn HubSpot records into rows. Each table has fixed columns and,
//! for CRM objects, one dynamic column per discovered property.
//!
//! # Overview
//!
//! - [`Column`] names a value and where it comes from ([`ColumnSource`])
//! - [`Table`] groups columns and knows its API paths
//! - [`builtin_tables`] returns the company, contact, deal, ticket and owner tables

mod column;
mod definitions;
mod table;

pub use column::{
    convert, parse_timestamp, Column, ColumnSource, PROPERTIES_WITH_HISTORY_FIELD,
};
pub use definitions::{associated_types, builtin_table, builtin_tables, CRM_OBJECT_TYPES};
pub use table::{fill, Table, TableKind};
