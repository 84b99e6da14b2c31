//! Persistent generation store via DuckDB
//!
//! Stores generations in a DuckDB file (or in memory) and serves the same
//! paging contract as the in-memory store.

mod engine;

pub use engine::DuckDbStore;
