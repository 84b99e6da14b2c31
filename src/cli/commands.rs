//! CLI commands and argument parsing

use crate::store::Visibility;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Randomized gallery pager
#[derive(Parser, Debug)]
#[command(name = "gallery-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// DuckDB database file (overrides config)
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Records per page (overrides config)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Fetch a single gallery page and print it as JSON
    Page {
        /// Page to fetch, resolved the same way as the HTTP query parameter
        #[arg(long)]
        page: Option<String>,

        /// Which generations to include (overrides config)
        #[arg(long, value_enum)]
        visibility: Option<Visibility>,

        /// Records per page (overrides config)
        #[arg(long)]
        page_size: Option<usize>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Import generations from a JSON array file into the database
    Import {
        /// JSON file containing an array of generations
        file: PathBuf,
    },
}
