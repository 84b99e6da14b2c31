//! Pagination types
//!
//! Page request/response shapes and the overfetch arithmetic shared by the
//! fetcher and the bundled stores.

use serde::{Deserialize, Serialize};

/// Records per gallery page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Largest accepted page size
pub const MAX_PAGE_SIZE: usize = 10_000;

/// A normalized page request (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// Requested page, always >= 1
    pub page: u64,
}

impl PageRequest {
    /// Create a request for `page`, clamping 0 to the first page
    pub fn new(page: u64) -> Self {
        Self { page: page.max(1) }
    }

    /// Create a request from an untrusted query value
    pub fn from_query(raw: Option<&str>) -> Self {
        Self::new(super::resolve_page(raw))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1)
    }
}

/// One page of a randomized listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<R> {
    /// Records on this page, in randomized order
    pub generations: Vec<R>,
    /// The page that was served
    pub page: u64,
    /// Next page number, absent on the last page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
}

impl<R> PageResponse<R> {
    /// Whether a further page exists
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// Number of records on this page
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Whether this page is empty
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }
}

/// Offset of the first record of `page` when fetching `limit` records per call.
///
/// Each call fetches a page of `limit - 1` records plus one lookahead, so
/// pages start every `limit - 1` records. Saturates instead of overflowing.
pub fn page_offset(page: u64, limit: usize) -> u64 {
    let window = limit.saturating_sub(1) as u64;
    page.saturating_sub(1).saturating_mul(window)
}

/// Split an overfetched batch into the page and the next-page cursor.
///
/// The flag is decided from the raw fetched count before truncating.
pub fn split_overfetch<R>(
    mut records: Vec<R>,
    page: u64,
    page_size: usize,
) -> (Vec<R>, Option<u64>) {
    let has_more = records.len() > page_size;
    if !has_more {
        return (records, None);
    }
    records.truncate(page_size);
    (records, page.checked_add(1))
}
