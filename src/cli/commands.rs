//! CLI commands and argument parsing

use crate::config::{ConfigOverrides, TableBackend};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stock price bar ingest CLI
#[derive(Parser, Debug)]
#[command(name = "stockbar-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Table backend
    #[arg(long, global = true)]
    pub table_backend: Option<TableBackend>,

    /// Table name
    #[arg(long, global = true)]
    pub table_name: Option<String>,

    /// DuckDB database file (duckdb backend)
    #[arg(long, global = true)]
    pub duckdb_path: Option<PathBuf>,

    /// Read objects from a local directory (one subdirectory per bucket) instead of S3
    #[arg(long, global = true)]
    pub source_root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config values given as flags
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            table_backend: self.table_backend,
            table_name: self.table_name.clone(),
            duckdb_path: self.duckdb_path.clone(),
            source_root: self.source_root.clone(),
        }
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a queue invocation event and print the response
    Handle {
        /// Event JSON file (stdin when omitted)
        #[arg(short, long)]
        event: Option<PathBuf>,
    },

    /// Ingest a single object
    Ingest {
        /// Bucket name
        #[arg(long)]
        bucket: String,

        /// Object key
        #[arg(long)]
        key: String,
    },

    /// Show the symbol, timestamp and partition key for an object key
    ParseKey {
        /// Object key, e.g. stocks/LYFT/LYFT2025-11-17_15-26-55.csv
        key: String,
    },

    /// Start HTTP invoke mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}
