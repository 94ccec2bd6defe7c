//! Key-value table module
//!
//! Price bars are upserted into a table keyed by
//! (`symbol_timestamp`, `row_key`). Writes are plain overwrites: the
//! pipeline never reads, deletes or checks for existing items.
//!
//! # Overview
//!
//! This module provides:
//! - `BarTable` - Trait for upserting one record
//! - `DynamoTable` - Amazon DynamoDB table
//! - `DuckDbTable` - Local DuckDB table (file or in-memory)
//! - `MemoryTable` - In-process table for dry runs and tests

mod dynamo;
mod local;
mod memory;

pub use dynamo::DynamoTable;
pub use local::DuckDbTable;
pub use memory::MemoryTable;

use crate::error::Result;
use crate::record::BarRecord;
use async_trait::async_trait;

/// Trait for tables that accept bar records
#[async_trait]
pub trait BarTable: Send + Sync {
    /// Table name
    fn name(&self) -> &str;

    /// Backend label used in invocation summaries
    fn label(&self) -> &str;

    /// Insert or overwrite one record by its composite key
    async fn put(&self, record: &BarRecord) -> Result<()>;
}
