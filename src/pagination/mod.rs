//! Pagination module
//!
//! Resolves untrusted page numbers and serves randomized pages using a
//! one-record overfetch to detect whether a next page exists.
//!
//! # Overview
//!
//! A request for page `p` with page size `n` makes a single store call for
//! `n + 1` records. If more than `n` come back, the page is truncated to `n`
//! and `next = p + 1`; otherwise there is no next page. The kept records are
//! shuffled only after that decision, so ordering never affects which records
//! land on which page.

mod fetcher;
mod resolver;
mod types;

pub use fetcher::PageFetcher;
pub use resolver::resolve_page;
pub use types::{
    page_offset, split_overfetch, PageRequest, PageResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
