//! Pagination types
//!
//! HubSpot list endpoints return `{results, paging: {next: {after}}}`. A
//! missing `paging.next` marks the last page.

use crate::http::RequestConfig;
use serde::{Deserialize, Serialize};

/// Largest page HubSpot serves for object list endpoints
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used for association listing
pub const ASSOCIATION_PAGE_SIZE: u32 = 500;

/// One page of a list response
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Records on this page, in server order
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    /// Paging metadata
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> Page<T> {
    /// Build a page by hand
    pub fn new(results: Vec<T>, after: Option<&str>) -> Self {
        Self {
            results,
            paging: after.map(|after| Paging {
                next: Some(NextCursor {
                    after: after.to_string(),
                    link: None,
                }),
            }),
        }
    }

    /// Cursor for the following page, `None` on the last page
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging
            .as_ref()
            .and_then(|p| p.next.as_ref())
            .map(|n| n.after.as_str())
            .filter(|after| !after.is_empty())
    }
}

/// Paging metadata of a list response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paging {
    /// Pointer to the next page
    #[serde(default)]
    pub next: Option<NextCursor>,
}

/// Next-page pointer
#[derive(Debug, Clone, Deserialize)]
pub struct NextCursor {
    /// Opaque cursor to send as `after`
    pub after: String,
    /// Full URL of the next page
    #[serde(default)]
    pub link: Option<String>,
}

/// Parameters for one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Records to request
    pub limit: u32,
    /// Cursor from the previous page; `None` for the first page
    pub after: Option<String>,
    /// Row budget left before this page, `None` when unlimited
    pub remaining: Option<usize>,
}

impl PageRequest {
    /// Add `limit` and `after` to a request
    pub fn apply(&self, config: RequestConfig) -> RequestConfig {
        config
            .query("limit", self.limit.to_string())
            .query_opt("after", self.after.clone())
    }

    /// Drop records past the row budget
    ///
    /// Servers may return more than `limit`; anything beyond the budget
    /// would be discarded by the fetch loop anyway.
    pub fn trim<T>(&self, results: &mut Vec<T>) {
        if let Some(remaining) = self.remaining {
            results.truncate(remaining);
        }
    }
}

/// Options for a paginated fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Maximum records per page request
    pub page_size: u32,
    /// Stop after this many records
    pub row_limit: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            row_limit: None,
        }
    }
}

impl FetchOptions {
    /// Options with the given page size and no row limit
    pub fn page_size(page_size: u32) -> Self {
        Self {
            page_size,
            row_limit: None,
        }
    }

    /// Set the row limit
    #[must_use]
    pub fn limit(mut self, row_limit: Option<usize>) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Records still allowed after `emitted`, `None` when unlimited
    pub fn remaining(&self, emitted: usize) -> Option<usize> {
        self.row_limit.map(|limit| limit.saturating_sub(emitted))
    }

    /// Page size for the next request
    pub fn page_limit(&self, emitted: usize) -> u32 {
        match self.remaining(emitted) {
            Some(remaining) => self.page_size.min(remaining.min(u32::MAX as usize) as u32),
            None => self.page_size,
        }
    }
}

/// Why a paginated fetch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The last page was consumed
    Exhausted,
    /// The row limit was reached
    RowLimit,
    /// The caller cancelled
    Cancelled,
}

/// Outcome of a paginated fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    /// Records handed to the callback
    pub rows: usize,
    /// Page requests that completed
    pub pages: usize,
    /// Why the loop ended
    pub stop: StopReason,
}

/// Progress through a paginated fetch
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Cursor for the next request
    pub cursor: Option<String>,
    /// Pages fetched
    pub pages: usize,
    /// Records emitted
    pub emitted: usize,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Close out the fetch
    pub fn finish(&self, stop: StopReason) -> FetchSummary {
        FetchSummary {
            rows: self.emitted,
            pages: self.pages,
            stop,
        }
    }
}
