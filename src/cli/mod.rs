//! CLI module
//!
//! Command-line interface for running the ingest pipeline.
//!
//! # Commands
//!
//! - `handle` - Process a queue invocation event (file or stdin)
//! - `ingest` - Ingest a single stored object
//! - `parse-key` - Show how an object key splits into symbol and timestamp
//! - `serve` - Start HTTP invoke mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve};
