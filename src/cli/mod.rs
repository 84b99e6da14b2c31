//! CLI module
//!
//! Command-line interface for the gallery pager.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `page` - Fetch one randomized page and print it
//! - `import` - Load generations from a JSON file into the database

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::{read_generations, Runner};
pub use server::{router, serve, serve_listener, ServerConfig};
