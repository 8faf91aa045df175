//! Pagination module
//!
//! HubSpot lists are cursor paginated: each page may carry `paging.next.after`,
//! which is sent back as `after` to get the following page.
//!
//! # Overview
//!
//! [`fetch_pages`] drives the cursor for any list endpoint, honouring an
//! optional row limit and a cancellation token. [`fetch_associations`] builds
//! on it to drain the association endpoint of a single record.

mod associations;
mod fetcher;
mod types;

pub use associations::{associations_path, fetch_associations, AssociatedId};
pub use fetcher::fetch_pages;
pub use types::{
    FetchOptions, FetchSummary, NextCursor, Page, PageRequest, Paging, PaginationState,
    StopReason, ASSOCIATION_PAGE_SIZE, MAX_PAGE_SIZE,
};

#[cfg(test)]
mod tests;
