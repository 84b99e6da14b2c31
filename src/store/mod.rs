//! Generation store module
//!
//! The pager treats the store as an external collaborator: it asks for one
//! page's worth of records plus one lookahead record and nothing else.
//!
//! # Overview
//!
//! - `GenerationStore` - the trait the pager consumes
//! - `Generation` - the gallery record served by the bundled stores
//! - `Visibility` - the filter the bundled stores understand
//! - `MemoryStore` - an in-memory store (the DuckDB store lives in `database`)

mod memory;
mod types;

pub use memory::{FetchCall, MemoryStore};
pub use types::{Generation, GenerationStore, NamedRef, TextRef, Visibility};

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests;
