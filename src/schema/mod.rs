//! Schema discovery module
//!
//! HubSpot publishes the properties of each CRM object type, including
//! custom ones. This module fetches and caches those descriptors and maps
//! their declared types to column types.

mod registry;
mod types;

pub use registry::{Properties, SchemaRegistry};
pub use types::{column_type_for, PropertyDescriptor, PropertyType};
