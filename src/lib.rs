// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # stockbar-ingest
//!
//! Ingests CSV files of stock price bars from object storage into a
//! key-value table, one queue notification batch at a time.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stockbar_ingest::config::IngestConfig;
//!
//! #[tokio::main]
//! async fn main() -> stockbar_ingest::Result<()> {
//!     let pipeline = IngestConfig::load("ingest.yaml")?.build_pipeline().await?;
//!
//!     let event = serde_json::json!({ "Records": [] });
//!     let response = pipeline.handle_event(&event).await;
//!     println!("{}", response.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                      IngestPipeline                           │
//! │  handle_event(event) → InvocationResponse                     │
//! └───────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬──────────┬────────┴─────┬────────────┬────────────┐
//! │ Envelope │   Keys   │    Source    │   Record   │   Table    │
//! ├──────────┼──────────┼──────────────┼────────────┼────────────┤
//! │ Queue    │ Symbol   │ S3           │ Decimal    │ DynamoDB   │
//! │ batch    │ Timestamp│ Local dir    │ Volume     │ DuckDB     │
//! │ S3 event │ Row key  │ CSV decode   │ BarRecord  │ Memory     │
//! └──────────┴──────────┴──────────────┴────────────┴────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Queue and object-write notification envelopes
pub mod envelope;

/// Object key parsing and composite keys
pub mod keys;

/// CSV decoding
pub mod decode;

/// Bar records and numeric coercion
pub mod record;

/// Object storage sources
pub mod source;

/// Destination tables
pub mod table;

/// Batch transform pipeline
pub mod pipeline;

/// Configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use pipeline::{BatchSummary, IngestPipeline, InvocationResponse, MessageOutcome};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
