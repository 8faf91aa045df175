//! Cursor pagination loop
//!
//! One loop serves every list endpoint. Callers supply how to fetch a page
//! and what to do with each record; the loop owns the cursor, the row
//! budget and cancellation.

use super::types::{FetchOptions, FetchSummary, Page, PageRequest, PaginationState, StopReason};
use crate::error::Result;
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Fetch pages until the cursor runs out, the row limit is met, or `cancel` fires
///
/// `on_record` sees every record in page order. Stopping early on the row
/// limit or cancellation is a success: records already emitted stand. A
/// failed page request ends the loop with that error.
pub async fn fetch_pages<T, F, Fut, R>(
    options: &FetchOptions,
    cancel: &CancellationToken,
    mut fetch_page: F,
    mut on_record: R,
) -> Result<FetchSummary>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    R: FnMut(T),
{
    let mut state = PaginationState::new();

    if options.row_limit == Some(0) {
        return Ok(state.finish(StopReason::RowLimit));
    }

    loop {
        let request = PageRequest {
            limit: options.page_limit(state.emitted),
            after: state.cursor.clone(),
            remaining: options.remaining(state.emitted),
        };
        debug!(
            "Requesting page {} (limit {}, after {:?})",
            state.pages + 1,
            request.limit,
            request.after
        );

        let page = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!("Fetch cancelled before page {}", state.pages + 1);
                return Ok(state.finish(StopReason::Cancelled));
            }
            page = fetch_page(request) => page?,
        };
        state.pages += 1;

        let next = page.next_cursor().map(str::to_string);

        for record in page.results {
            on_record(record);
            state.emitted += 1;

            if options.remaining(state.emitted) == Some(0) {
                debug!("Row limit reached after {} records", state.emitted);
                return Ok(state.finish(StopReason::RowLimit));
            }
            if cancel.is_cancelled() {
                debug!("Fetch cancelled after {} records", state.emitted);
                return Ok(state.finish(StopReason::Cancelled));
            }
        }

        match next {
            Some(cursor) => state.cursor = Some(cursor),
            None => return Ok(state.finish(StopReason::Exhausted)),
        }
    }
}
