//! # Gallery Pager
//!
//! Serves a paginated, randomized listing of gallery generations.
//!
//! ## How a page is served
//!
//! - The `page` query value is untrusted: anything that is not an integer >= 1
//!   becomes page 1.
//! - The store is asked once for `page_size + 1` records. The extra record only
//!   signals that another page exists; no count query is issued.
//! - The page is truncated to `page_size`, then shuffled with a freshly seeded
//!   generator. `next` is present only when the lookahead record came back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gallery_pager::{PageFetcher, PageRequest, MemoryStore, Visibility};
//!
//! #[tokio::main]
//! async fn main() -> gallery_pager::Result<()> {
//!     let fetcher = PageFetcher::new(MemoryStore::new());
//!     let request = PageRequest::from_query(Some("2"));
//!     let page = fetcher.fetch(request, &Visibility::VisibleOnly).await?;
//!     println!("{}", serde_json::to_string(&page)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            HTTP (axum)   GET /gallery?page=N             │
//! └─────────────────────────────┬────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴─────────────┬──────────────┐
//! │   Resolver   │        PageFetcher         │    Store     │
//! ├──────────────┼────────────────────────────┼──────────────┤
//! │ raw → page   │ overfetch, truncate,       │ Memory       │
//! │              │ shuffle, next cursor       │ DuckDB       │
//! └──────────────┴────────────────────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_self)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Page resolution and the overfetching, shuffling fetcher
pub mod pagination;

/// Store trait, generation record, in-memory store
pub mod store;

/// DuckDB-backed store
pub mod database;

/// Application configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};

pub use config::AppConfig;
pub use database::DuckDbStore;
pub use pagination::{
    resolve_page, PageFetcher, PageRequest, PageResponse, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use store::{Generation, GenerationStore, MemoryStore, Visibility};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
