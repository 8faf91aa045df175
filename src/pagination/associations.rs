//! Association listing
//!
//! Same cursor walk as object listing, with a fixed page size and no row
//! limit: every page is drained and the ids are returned together.

use super::fetcher::fetch_pages;
use super::types::{FetchOptions, Page, ASSOCIATION_PAGE_SIZE};
use crate::error::{Error, Result, ResultExt};
use crate::http::{path_segment, HttpClient, RequestConfig};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A record linked to another record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociatedId {
    /// Id of the associated record
    #[serde(deserialize_with = "crate::types::string_or_number")]
    pub id: String,
    /// Association label, e.g. `company_to_contact`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub association_type: Option<String>,
}

/// Path of the association endpoint for one record
///
/// `None` when `record_id` cannot be used as a path segment.
pub fn associations_path(from_type: &str, record_id: &str, to_type: &str) -> Option<String> {
    path_segment(record_id)
        .map(|id| format!("/crm/v3/objects/{from_type}/{id}/associations/{to_type}"))
}

/// List every record of `to_type` associated with `record_id`
pub async fn fetch_associations(
    client: &HttpClient,
    record_id: &str,
    from_type: &str,
    to_type: &str,
) -> Result<Vec<AssociatedId>> {
    let path = associations_path(from_type, record_id, to_type).ok_or_else(|| {
        Error::invalid_value("record_id", format!("'{record_id}' is not a record id"))
    })?;
    let path = path.as_str();
    let options = FetchOptions::page_size(ASSOCIATION_PAGE_SIZE);
    let never = CancellationToken::new();
    let mut ids = Vec::new();

    fetch_pages(
        &options,
        &never,
        move |request| {
            let config = request.apply(RequestConfig::new());
            async move { client.get_json::<Page<AssociatedId>>(path, config).await }
        },
        |id| ids.push(id),
    )
    .await
    .with_operation("list_associations", from_type)?;

    debug!(
        "Record {}/{} has {} {} associations",
        from_type,
        record_id,
        ids.len(),
        to_type
    );
    Ok(ids)
}
