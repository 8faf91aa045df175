//! Connector trait and HubSpot implementation
//!
//! Defines the operations a host drives (check, tables, list, get) and the
//! HubSpot connector that implements them over the REST API.

mod account;
mod hubspot;

pub use account::AccountInfo;
pub use hubspot::HubSpotConnector;

use crate::error::Result;
use crate::pagination::FetchSummary;
use crate::tables::Table;
use crate::types::Row;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tokio_util::sync::CancellationToken;

// ============================================================================
// Check Result
// ============================================================================

/// Result of a connection check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the check succeeded
    pub success: bool,

    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Portal the credentials belong to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_id: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn success(portal_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: None,
            portal_id: Some(portal_id.into()),
        }
    }

    /// Create a failed check result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            portal_id: None,
        }
    }
}

// ============================================================================
// List Request
// ============================================================================

/// Parameters of one list invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    /// List archived records instead of active ones
    #[serde(default)]
    pub archived: bool,

    /// Stop after this many rows
    #[serde(default)]
    pub limit: Option<usize>,

    /// Columns to produce; all when `None`
    #[serde(default)]
    pub columns: Option<Vec<String>>,
}

impl ListRequest {
    /// Request every active record with all columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter on the archived flag
    #[must_use]
    pub fn archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self
    }

    /// Limit the number of rows
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Project onto the named columns
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// Connector Trait
// ============================================================================

/// Type alias for the row stream returned by `list_stream()`
pub type RowStream = Pin<Box<dyn Stream<Item = Result<Row>> + Send>>;

/// Operations a host can run against a data source
#[async_trait]
pub trait Connector: Send + Sync {
    /// Tests if credentials and configuration are valid
    async fn check(&self) -> Result<CheckResult>;

    /// Lists available tables with their full column sets
    async fn tables(&self) -> Result<Vec<Table>>;

    /// Streams the rows of `table` into `on_row`
    ///
    /// Ends early, successfully, when the row limit is reached or `cancel`
    /// fires.
    async fn list(
        &self,
        table: &str,
        request: &ListRequest,
        cancel: &CancellationToken,
        on_row: &mut (dyn FnMut(Row) + Send),
    ) -> Result<FetchSummary>;

    /// Fetches one row by id with only the named columns
    ///
    /// `None` when the record does not exist. Unselected hydrated columns
    /// cost no requests.
    async fn get_selected(
        &self,
        table: &str,
        id: &str,
        columns: Option<&[String]>,
    ) -> Result<Option<Row>>;

    /// Fetches one row by id with every column; `None` when it does not exist
    async fn get(&self, table: &str, id: &str) -> Result<Option<Row>> {
        self.get_selected(table, id, None).await
    }
}
